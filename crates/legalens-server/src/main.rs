//! `LegaLens` server entry point.
//!
//! Loads configuration, builds the analyzer and advisor around the HTTP
//! completion client, then starts the Axum HTTP server with graceful
//! shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use legalens_server::config::ServerConfig;
use legalens_server::routes;
use legalens_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        completion = ?config.completion,
        analysis_model = %config.analysis_model,
        advice_model = %config.advice_model,
        advice_upstream = config.advice_upstream,
        "LegaLens starting"
    );

    let state = AppState::from_config(&config).context("failed to build completion client")?;

    if !state.upstream_configured {
        warn!("no completion API key configured, analyses will use synthetic output");
    }
    if state.sessions.is_empty() {
        warn!("no session tokens configured, legal advice will reject every caller");
    } else {
        info!(sessions = state.sessions.len(), "session tokens loaded");
    }

    let app = routes::build_router(Arc::new(state), &config);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "LegaLens server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("LegaLens server stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
