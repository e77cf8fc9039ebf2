//! Server configuration for `LegaLens`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `LEGALENS_*` environment variables.

use std::fmt;
use std::net::SocketAddr;

use legalens_core::advisor::DEFAULT_ADVICE_MODEL;
use legalens_core::analyzer::{DEFAULT_ANALYSIS_MODEL, DEFAULT_MAX_DOCUMENT_BYTES};

/// Default chat-completions endpoint.
pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Completion service connection settings.
    pub completion: CompletionConfig,
    /// Model used for document analysis.
    pub analysis_model: String,
    /// Model used for legal advice.
    pub advice_model: String,
    /// Whether legal advice goes to the completion service instead of the
    /// canned response bank.
    pub advice_upstream: bool,
    /// Session tokens accepted on `Authorization: Bearer`.
    pub session_tokens: Vec<String>,
    /// Largest document accepted for analysis, in bytes.
    pub max_document_bytes: usize,
    /// Concurrent analysis/advice requests allowed in flight.
    pub max_concurrent_requests: usize,
}

/// Connection settings for the completion service.
#[derive(Clone)]
pub struct CompletionConfig {
    /// Chat-completions endpoint URL.
    pub url: String,
    /// Bearer credential. `None` disables the upstream path entirely.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (binds to `0.0.0.0`)
    /// - `LEGALENS_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:8300`)
    /// - `LEGALENS_LOG_LEVEL` — log filter (default: `info`)
    /// - `LEGALENS_COMPLETION_URL` — chat-completions endpoint
    /// - `LEGALENS_COMPLETION_API_KEY` — bearer credential (falls back to `OPENAI_API_KEY`)
    /// - `LEGALENS_COMPLETION_TIMEOUT_SECS` — request timeout (default: `45`)
    /// - `LEGALENS_ANALYSIS_MODEL` — analysis model (default: `gpt-4o-mini`)
    /// - `LEGALENS_ADVICE_MODEL` — advice model (default: `gpt-4o`)
    /// - `LEGALENS_ADVICE_UPSTREAM` — send advice queries upstream (default: `false`)
    /// - `LEGALENS_SESSION_TOKENS` — comma-separated accepted session tokens
    /// - `LEGALENS_MAX_DOCUMENT_BYTES` — document size limit (default: 10 MiB)
    /// - `LEGALENS_MAX_CONCURRENT_REQUESTS` — in-flight request limit (default: `32`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_addr = SocketAddr::from(([127, 0, 0, 1], 8300));

        // Priority: LEGALENS_BIND_ADDR > PORT > default
        let bind_addr = if let Some(addr) = lookup("LEGALENS_BIND_ADDR") {
            addr.parse().unwrap_or(default_addr)
        } else if let Some(port_str) = lookup("PORT") {
            let port: u16 = port_str.parse().unwrap_or(8300);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            default_addr
        };

        let log_level = lookup("LEGALENS_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let api_key = lookup("LEGALENS_COMPLETION_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .filter(|k| !k.trim().is_empty());

        let completion = CompletionConfig {
            url: lookup("LEGALENS_COMPLETION_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_owned()),
            api_key,
            timeout_secs: parse_or(lookup("LEGALENS_COMPLETION_TIMEOUT_SECS"), 45),
        };

        let advice_upstream = lookup("LEGALENS_ADVICE_UPSTREAM")
            .is_some_and(|v| v == "true" || v == "1");

        let session_tokens = lookup("LEGALENS_SESSION_TOKENS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bind_addr,
            log_level,
            completion,
            analysis_model: lookup("LEGALENS_ANALYSIS_MODEL")
                .unwrap_or_else(|| DEFAULT_ANALYSIS_MODEL.to_owned()),
            advice_model: lookup("LEGALENS_ADVICE_MODEL")
                .unwrap_or_else(|| DEFAULT_ADVICE_MODEL.to_owned()),
            advice_upstream,
            session_tokens,
            max_document_bytes: parse_or(
                lookup("LEGALENS_MAX_DOCUMENT_BYTES"),
                DEFAULT_MAX_DOCUMENT_BYTES,
            ),
            max_concurrent_requests: parse_or::<usize>(
                lookup("LEGALENS_MAX_CONCURRENT_REQUESTS"),
                32,
            )
            .max(1),
        }
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
