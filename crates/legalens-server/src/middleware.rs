//! Request middleware for `LegaLens`.
//!
//! The session middleware reads `Authorization: Bearer <token>`, resolves it
//! against the session store, and injects the resulting `AuthContext` into
//! the request extensions. Requests are never rejected there; operations that
//! need a session check the context themselves.
//!
//! The concurrency middleware makes requests wait for a slot in the
//! server-wide pool before they reach a handler.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;
use crate::state::AppState;

/// Extract the bearer token from the request, if any.
fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that attaches an `AuthContext` to every request.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let auth = state.sessions.resolve(bearer_token(&req));
    req.extensions_mut().insert(auth);
    next.run(req).await
}

/// Middleware that holds one shared request slot for the whole request.
///
/// # Errors
///
/// Returns `AppError::Internal` if the slot pool has been closed.
pub async fn concurrency_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let _permit = state
        .request_slots
        .acquire()
        .await
        .map_err(|_| AppError::Internal("request slot pool closed".to_owned()))?;
    Ok(next.run(req).await)
}
