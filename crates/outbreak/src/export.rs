//! Exporters for laid-out transmission networks.

pub mod svg;

use thiserror::Error;

/// Errors raised while exporting a network.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid style: {0}")]
    Style(String),

    #[error("Failed to serialize positions: {0}")]
    Positions(#[from] serde_json::Error),
}
