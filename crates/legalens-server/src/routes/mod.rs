//! HTTP route handlers and router assembly.

pub mod advice;
pub mod analysis;
pub mod precedents;
pub mod sys;

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, FromRequest};
use axum::http::HeaderValue;
use axum::middleware as axum_mw;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::middleware::{concurrency_middleware, session_middleware};
use crate::state::AppState;

/// Worst-case growth of text once JSON-escaped (`\u00XX` for control bytes).
const JSON_ESCAPE_FACTOR: usize = 6;

/// Slack on top of the escaped document for the rest of the JSON body.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// JSON body extractor whose rejections use the API error format.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Largest request body accepted, so that any document within
/// `max_document_bytes` fits however it is escaped.
pub fn body_limit(max_document_bytes: usize) -> usize {
    max_document_bytes
        .saturating_mul(JSON_ESCAPE_FACTOR)
        .saturating_add(BODY_LIMIT_SLACK)
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    // One slot pool for every route that may call the completion service.
    let api_routes = Router::new()
        .nest("/v1/analysis", analysis::router())
        .nest("/v1/advice", advice::router())
        .layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            concurrency_middleware,
        ))
        .layer(DefaultBodyLimit::max(body_limit(config.max_document_bytes)));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    Router::new()
        .nest("/v1/sys", sys::router())
        .nest("/v1/precedents", precedents::router())
        .merge(api_routes)
        .layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}
