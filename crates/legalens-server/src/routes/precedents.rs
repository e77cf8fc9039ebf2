//! Precedent search route: `/v1/precedents/search`
//!
//! Open to anonymous callers. Served from the local case bank, so it does not
//! take a request slot.

use std::sync::Arc;

use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use legalens_core::precedent::{self, Precedent};

use crate::error::AppError;
use crate::routes::ApiJson;
use crate::state::AppState;

/// Build the `/v1/precedents` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/search", post(search))
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub results: Vec<Precedent>,
}

/// `POST /v1/precedents/search`
async fn search(ApiJson(body): ApiJson<SearchRequest>) -> Result<Json<SearchResponse>, AppError> {
    let results = precedent::search(&body.query)?;
    info!(matches = results.len(), "precedent search");
    Ok(Json(SearchResponse {
        count: results.len(),
        results,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use legalens_core::completion::DisabledCompletionClient;

    use crate::routes::test_support::{router, send};

    #[tokio::test]
    async fn matching_groups_are_combined() {
        let app = router(Arc::new(DisabledCompletionClient), &[]);
        let (status, _, body) = send(
            app,
            "POST",
            "/v1/precedents/search",
            None,
            Some(json!({"query": "contract damages"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["count"], 3);
        let ids: Vec<&str> = json["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["1", "2", "4"]);
        assert_eq!(json["results"][2]["court"], "District Court");
    }

    #[tokio::test]
    async fn no_match_is_an_empty_list() {
        let app = router(Arc::new(DisabledCompletionClient), &[]);
        let (status, _, body) = send(
            app,
            "POST",
            "/v1/precedents/search",
            None,
            Some(json!({"query": "maritime salvage"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["count"], 0);
        assert_eq!(json["results"], json!([]));
    }

    #[tokio::test]
    async fn blank_query_is_bad_request() {
        let app = router(Arc::new(DisabledCompletionClient), &[]);
        let (status, _, body) = send(
            app,
            "POST",
            "/v1/precedents/search",
            None,
            Some(json!({"query": "   "})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "bad_request");
    }
}
