//! Error types for `legalens-core`.
//!
//! Completion failures are classified before any recovery policy is applied,
//! so "never asked", "upstream refused" and "could not parse the reply" stay
//! distinguishable even where the analyzer recovers from all of them alike.

use std::fmt;

/// Which decode step rejected a completion response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    /// The transport envelope (`choices[0].message.content`).
    Envelope,
    /// The structured payload carried inside the envelope content.
    Payload,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope => f.write_str("envelope"),
            Self::Payload => f.write_str("payload"),
        }
    }
}

/// Errors from a call to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// The completion service is not configured or switched off.
    #[error("completion service is disabled")]
    Disabled,

    /// Network or transport failure before a response was received.
    #[error("completion service unreachable: {reason}")]
    Unavailable { reason: String },

    /// The service answered with a non-success status code.
    #[error("completion service returned status {status}")]
    Status { status: u16 },

    /// No response within the configured timeout.
    #[error("completion service timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// A response arrived but did not have the expected shape.
    #[error("malformed completion response ({stage}): {reason}")]
    MalformedResponse { stage: DecodeStage, reason: String },
}

impl CompletionError {
    /// Whether retrying the same request later could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable { .. } | Self::Timeout { .. } => true,
            Self::Status { status } => *status == 429 || *status >= 500,
            Self::Disabled | Self::MalformedResponse { .. } => false,
        }
    }

    pub(crate) fn malformed(stage: DecodeStage, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            stage,
            reason: reason.into(),
        }
    }
}

/// Errors from document analysis.
///
/// Upstream failures never appear here; they are recovered by the fallback
/// generator. Only local precondition failures are surfaced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The caller supplied input that cannot be analyzed.
    #[error("invalid document: {reason}")]
    InvalidInput { reason: String },
}

/// Errors from the legal advisor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdviceError {
    /// The caller has no active session.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The query is empty or otherwise unusable.
    #[error("invalid query: {reason}")]
    InvalidInput { reason: String },

    /// The completion service failed while the upstream path was enabled.
    #[error("legal advice service failed: {0}")]
    Upstream(#[from] CompletionError),
}

impl AdviceError {
    /// Whether the caller may retry the same query later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream(inner) => inner.is_retryable(),
            Self::AuthenticationRequired | Self::InvalidInput { .. } => false,
        }
    }
}

/// Errors from precedent search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The query is empty.
    #[error("invalid search query: {reason}")]
    InvalidInput { reason: String },
}
