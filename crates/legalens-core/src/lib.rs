//! Core library for `LegaLens`.
//!
//! Contains the analysis data model, the document analyzer with its
//! synthetic fallback generator, the legal advisor with its keyword-routed
//! response bank, the precedent search over a fixed case bank, and the
//! [`completion::CompletionClient`] seam through which the analyzer and
//! advisor talk to an external completion service. This crate performs no I/O
//! of its own; the HTTP transport lives in `legalens-server`.

pub mod advisor;
pub mod analyzer;
pub mod auth;
pub mod completion;
pub mod error;
pub mod fallback;
pub mod model;
pub mod precedent;
