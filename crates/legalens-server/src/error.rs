//! HTTP error types for `LegaLens` server.
//!
//! Maps domain errors from `legalens-core` into appropriate HTTP responses.
//! Every error variant produces a JSON body with a machine-readable `error`
//! field and a human-readable `message`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use legalens_core::error::{AdviceError, AnalysisError, SearchError};

/// Message shown to callers that need to sign in.
pub const SIGN_IN_MESSAGE: &str = "Please sign in to use the legal assistant";

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The operation needs an active session.
    #[error("authentication required")]
    AuthenticationRequired,
    /// Client sent invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Request body exceeds the configured limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    /// The completion service failed; the caller may retry.
    #[error("upstream unavailable: {message}")]
    UpstreamUnavailable { message: String, retryable: bool },
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retryable: Option<bool>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message, retryable) = match self {
            Self::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                "authentication_required",
                SIGN_IN_MESSAGE.to_owned(),
                None,
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            Self::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg, None)
            }
            Self::UpstreamUnavailable { message, retryable } => (
                StatusCode::BAD_GATEWAY,
                "upstream_unavailable",
                message,
                Some(retryable),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_owned(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: error_type,
            message,
            retryable,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidInput { .. } => Self::PayloadTooLarge(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(rejection.body_text())
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<AdviceError> for AppError {
    fn from(err: AdviceError) -> Self {
        match err {
            AdviceError::AuthenticationRequired => Self::AuthenticationRequired,
            AdviceError::InvalidInput { .. } => Self::BadRequest(err.to_string()),
            AdviceError::Upstream(ref inner) => Self::UpstreamUnavailable {
                message: "the legal assistant is temporarily unavailable, please try again"
                    .to_owned(),
                retryable: inner.is_retryable(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use legalens_core::error::CompletionError;

    use super::*;

    #[test]
    fn advice_errors_map_to_statuses() {
        let cases = [
            (AdviceError::AuthenticationRequired, StatusCode::UNAUTHORIZED),
            (
                AdviceError::InvalidInput {
                    reason: "query is empty".to_owned(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AdviceError::Upstream(CompletionError::Status { status: 503 }),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn blank_search_is_400() {
        let err = SearchError::InvalidInput {
            reason: "query is empty".to_owned(),
        };
        assert_eq!(
            AppError::from(err).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn oversized_document_is_413() {
        let err = AnalysisError::InvalidInput {
            reason: "too big".to_owned(),
        };
        assert_eq!(
            AppError::from(err).into_response().status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
