//! Network sources.
//!
//! A [`NetworkSource`] produces the transmission network for an optional
//! organism filter. Two sources are provided:
//!
//! - [`HttpNetworkSource`] queries the surveillance REST API.
//! - [`FileNetworkSource`] reads a JSON snapshot from disk.
//!
//! Both decode the same JSON shape, see [`parse_snapshot`].

mod file;
mod http;

pub use file::FileNetworkSource;
pub use http::HttpNetworkSource;

use async_trait::async_trait;
use log::debug;

use outbreak_core::network::Network;

use crate::error::OutbreakError;

/// Asynchronous provider of transmission networks.
#[async_trait]
pub trait NetworkSource: Send + Sync {
    /// Fetches the network for `organism`, or the source's default network
    /// when no filter is given.
    ///
    /// # Errors
    ///
    /// Returns `OutbreakError` when the network cannot be retrieved or decoded.
    async fn fetch(&self, organism: Option<&str>) -> Result<Network, OutbreakError>;
}

/// Decodes a network snapshot.
///
/// A snapshot is either a single network object, as returned by the REST
/// API, or a JSON array of networks. For an array the first network whose
/// organism label equals `organism` is returned, or the first network when
/// no filter is given. A single network is returned as is.
///
/// # Errors
///
/// Returns [`OutbreakError::Json`] for malformed JSON and
/// [`OutbreakError::NotFound`] when no network in an array matches.
pub fn parse_snapshot(source: &str, organism: Option<&str>) -> Result<Network, OutbreakError> {
    if !source.trim_start().starts_with('[') {
        return serde_json::from_str(source)
            .map_err(|err| OutbreakError::new_json_error(err, source));
    }

    let networks: Vec<Network> =
        serde_json::from_str(source).map_err(|err| OutbreakError::new_json_error(err, source))?;
    debug!(networks = networks.len(); "Decoded multi-network snapshot");

    let not_found = || OutbreakError::NotFound {
        organism: organism.unwrap_or("<any>").to_string(),
    };
    match organism {
        Some(organism) => networks
            .into_iter()
            .find(|network| network.organism() == organism)
            .ok_or_else(not_found),
        None => networks.into_iter().next().ok_or_else(not_found),
    }
}
