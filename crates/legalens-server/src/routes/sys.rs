//! System routes: `/v1/sys/*`

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Build the `/v1/sys` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub upstream_configured: bool,
    pub advice_upstream_enabled: bool,
}

/// `GET /v1/sys/health`
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        upstream_configured: state.upstream_configured,
        advice_upstream_enabled: state.advisor.config().upstream_enabled,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use legalens_core::completion::DisabledCompletionClient;

    use crate::routes::test_support::{router, send};

    #[tokio::test]
    async fn health_reports_configuration() {
        let app = router(
            Arc::new(DisabledCompletionClient),
            &[("LEGALENS_ADVICE_UPSTREAM", "true")],
        );
        let (status, headers, body) = send(app, "GET", "/v1/sys/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["advice_upstream_enabled"], true);
        assert!(headers
            .iter()
            .any(|(k, v)| k == "x-content-type-options" && v == "nosniff"));
    }
}
