//! Error types for outbreak operations.
//!
//! This module provides the main error type [`OutbreakError`] which wraps
//! the error conditions that can occur while loading, laying out and
//! rendering a transmission network. The layout itself never fails.

use std::io;

use thiserror::Error;

/// The main error type for outbreak operations.
///
/// # Diagnostic Variants
///
/// The `Json` variant keeps the text that failed to parse, so callers can
/// point at the offending line and column when reporting.
#[derive(Debug, Error)]
pub enum OutbreakError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid network JSON: {err}")]
    Json { err: serde_json::Error, src: String },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("No transmission network found for organism `{organism}`")]
    NotFound { organism: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

impl OutbreakError {
    /// Create a new `Json` error with the associated source text.
    pub fn new_json_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Json {
            err,
            src: src.into(),
        }
    }

    /// Create a new `Http` error for a request to `url`.
    pub fn new_http_error(source: reqwest::Error, url: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            source,
        }
    }
}
