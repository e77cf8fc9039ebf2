//! Session token verification.
//!
//! Session tokens are issued by the external sign-in flow and handed to the
//! server as configuration. They are SHA-256 hashed on load and never kept
//! in plaintext.

use std::collections::HashSet;

use legalens_core::auth::AuthContext;
use sha2::{Digest, Sha256};

/// Hash a token with SHA-256 for storage/lookup.
#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Set of accepted session token hashes.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    hashes: HashSet<String>,
}

impl SessionStore {
    /// Build a store from plaintext tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hashes: tokens.into_iter().map(|t| hash_token(t.as_ref())).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Resolve a bearer token into an [`AuthContext`].
    ///
    /// Unknown or missing tokens resolve to an anonymous context; rejecting
    /// them is left to the operation that needs a session.
    #[must_use]
    pub fn resolve(&self, token: Option<&str>) -> AuthContext {
        let Some(token) = token else {
            return AuthContext::anonymous();
        };

        let hash = hash_token(token);
        if self.hashes.contains(&hash) {
            AuthContext::authenticated(format!("session:{}", &hash[..12]))
        } else {
            AuthContext::anonymous()
        }
    }
}
