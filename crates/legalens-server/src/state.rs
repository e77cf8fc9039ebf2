//! Shared application state for `LegaLens` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`.

use std::sync::Arc;

use tokio::sync::Semaphore;

use legalens_core::advisor::{AdvisorConfig, LegalAdvisor};
use legalens_core::analyzer::{AnalyzerConfig, DocumentAnalyzer};
use legalens_core::completion::{CompletionClient, DisabledCompletionClient};

use crate::config::ServerConfig;
use crate::session::SessionStore;
use crate::upstream::HttpCompletionClient;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Document analysis with synthetic fallback.
    pub analyzer: DocumentAnalyzer,
    /// Legal question answering.
    pub advisor: LegalAdvisor,
    /// Accepted session tokens.
    pub sessions: SessionStore,
    /// Slots shared by every analysis and advice request in flight.
    pub request_slots: Arc<Semaphore>,
    /// Whether a completion-service credential is configured.
    pub upstream_configured: bool,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP completion client cannot be constructed.
    pub fn from_config(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        let http = HttpCompletionClient::from_config(&config.completion)?;
        let upstream_configured = http.is_some();
        let client: Arc<dyn CompletionClient> = match http {
            Some(client) => Arc::new(client),
            None => Arc::new(DisabledCompletionClient),
        };

        Ok(Self::with_client(client, config, upstream_configured))
    }

    /// Build state around an explicit completion client.
    #[must_use]
    pub fn with_client(
        client: Arc<dyn CompletionClient>,
        config: &ServerConfig,
        upstream_configured: bool,
    ) -> Self {
        let analyzer = DocumentAnalyzer::new(
            Arc::clone(&client),
            AnalyzerConfig {
                model: config.analysis_model.clone(),
                max_document_bytes: config.max_document_bytes,
                ..AnalyzerConfig::default()
            },
        );

        let advisor = LegalAdvisor::new(
            client,
            AdvisorConfig {
                upstream_enabled: config.advice_upstream,
                model: config.advice_model.clone(),
                ..AdvisorConfig::default()
            },
        );

        Self {
            analyzer,
            advisor,
            sessions: SessionStore::from_tokens(&config.session_tokens),
            request_slots: Arc::new(Semaphore::new(config.max_concurrent_requests)),
            upstream_configured,
        }
    }
}
