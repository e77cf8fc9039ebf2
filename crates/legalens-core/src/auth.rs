//! Caller identity passed explicitly into operations that require a session.

/// Authentication state of the caller, resolved once per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    subject: Option<String>,
}

impl AuthContext {
    /// A caller with no active session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { subject: None }
    }

    /// A caller with an active session identified by `subject`.
    #[must_use]
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }

    /// Opaque label of the session holder, for logging.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}
