//! HTTP transport to the completion service.
//!
//! Holds the bearer credential server-side. Transport errors, timeouts and
//! non-success statuses are classified into [`CompletionError`] variants; the
//! body of a successful response goes through the core envelope decoder.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use legalens_core::completion::{decode_envelope, CompletionClient, CompletionRequest};
use legalens_core::error::CompletionError;

use crate::config::CompletionConfig;

/// Completion client speaking the chat-completions wire format over HTTPS.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for HttpCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCompletionClient")
            .field("url", &self.url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl HttpCompletionClient {
    /// Build a client from configuration. Returns `None` when no credential
    /// is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn from_config(config: &CompletionConfig) -> Result<Option<Self>, reqwest::Error> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            http,
            url: config.url.clone(),
            api_key,
            timeout_secs: config.timeout_secs,
        }))
    }

    fn classify(&self, err: &reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            CompletionError::Unavailable {
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        debug!(model = %request.model, "sending completion request");

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request.to_wire())
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "completion service returned error status");
            return Err(CompletionError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| self.classify(&e))?;
        decode_envelope(&body)
    }
}
