//! `LegaLens` HTTP server.
//!
//! Wires the core analyzer and advisor to an HTTP completion client that
//! holds the service credential, and exposes both over a JSON API at `/v1/*`.
//! Callers never see the credential; they authenticate with a session token.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod upstream;
