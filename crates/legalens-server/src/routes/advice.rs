//! Legal advice route: `/v1/advice`
//!
//! Requires a session. Anonymous callers get `401 authentication_required`
//! so the client can prompt them to sign in.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};

use legalens_core::auth::AuthContext;

use crate::error::AppError;
use crate::routes::ApiJson;
use crate::state::AppState;

/// Build the `/v1/advice` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(get_advice))
}

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub advice: String,
}

/// `POST /v1/advice` — answer a legal question.
async fn get_advice(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(body): ApiJson<AdviceRequest>,
) -> Result<Json<AdviceResponse>, AppError> {
    let advice = state.advisor.get_advice(&auth, &body.query).await?;
    Ok(Json(AdviceResponse { advice }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use serde_json::json;

    use legalens_core::advisor::Topic;
    use legalens_core::completion::{CompletionClient, CompletionRequest, DisabledCompletionClient};
    use legalens_core::error::CompletionError;

    use crate::routes::test_support::{router, send, SESSION};

    #[derive(Default)]
    struct CountingClient(AtomicUsize);

    #[async_trait]
    impl CompletionClient for CountingClient {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(CompletionError::Status { status: 503 })
        }
    }

    #[tokio::test]
    async fn anonymous_caller_is_asked_to_sign_in() {
        let client = Arc::new(CountingClient::default());
        let app = router(client.clone(), &[("LEGALENS_ADVICE_UPSTREAM", "true")]);
        let (status, _, body) = send(
            app,
            "POST",
            "/v1/advice",
            None,
            Some(json!({"query": "Is my contract valid?"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "authentication_required");
        assert_eq!(json["message"], "Please sign in to use the legal assistant");
        assert_eq!(client.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_token_is_treated_as_anonymous() {
        let app = router(Arc::new(DisabledCompletionClient), &[]);
        let (status, _, _) = send(
            app,
            "POST",
            "/v1/advice",
            Some("not-a-session"),
            Some(json!({"query": "Is my contract valid?"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn signed_in_caller_gets_canned_advice() {
        let app = router(Arc::new(DisabledCompletionClient), &[]);
        let (status, _, body) = send(
            app,
            "POST",
            "/v1/advice",
            Some(SESSION),
            Some(json!({"query": "My landlord kept the deposit"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["advice"], Topic::LandlordTenant.canned_response());
    }

    #[tokio::test]
    async fn malformed_body_gets_json_error() {
        let app = router(Arc::new(DisabledCompletionClient), &[]);
        let (status, _, body) = send(
            app,
            "POST",
            "/v1/advice",
            Some(SESSION),
            Some(json!({"question": "Is my contract valid?"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "bad_request");
        assert!(json["message"].as_str().unwrap().contains("query"));
    }

    #[tokio::test]
    async fn blank_query_is_bad_request() {
        let app = router(Arc::new(DisabledCompletionClient), &[]);
        let (status, _, _) = send(
            app,
            "POST",
            "/v1/advice",
            Some(SESSION),
            Some(json!({"query": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway_and_retryable() {
        let client = Arc::new(CountingClient::default());
        let app = router(client.clone(), &[("LEGALENS_ADVICE_UPSTREAM", "true")]);
        let (status, _, body) = send(
            app,
            "POST",
            "/v1/advice",
            Some(SESSION),
            Some(json!({"query": "Is my contract valid?"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "upstream_unavailable");
        assert_eq!(json["retryable"], true);
        assert_eq!(client.0.load(Ordering::SeqCst), 1);
    }
}
