//! REST API network source.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use outbreak_core::network::Network;

use super::{NetworkSource, parse_snapshot};
use crate::{config::SourceConfig, error::OutbreakError};

/// Path of the transmission-network endpoint, relative to the API base URL.
const NETWORK_ENDPOINT: &str = "transmission/network";

/// Fetches networks from `GET {base_url}/transmission/network?organism=...`.
#[derive(Debug, Clone)]
pub struct HttpNetworkSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNetworkSource {
    /// Create a source for `base_url` with default client settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(base_url, &SourceConfig::default())
    }

    /// Create a source for `base_url` using the timeout and user agent of `config`
    pub fn with_config(base_url: impl Into<String>, config: &SourceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms()))
            .user_agent(config.user_agent())
            .build()
            .unwrap_or_else(|err| {
                warn!(err:% = err; "Failed to build configured HTTP client, using defaults");
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the network endpoint, without query parameters
    pub fn network_url(&self) -> String {
        format!("{}/{NETWORK_ENDPOINT}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl NetworkSource for HttpNetworkSource {
    async fn fetch(&self, organism: Option<&str>) -> Result<Network, OutbreakError> {
        let url = self.network_url();
        info!(url = url.as_str(), organism:? = organism; "Fetching transmission network");

        let mut request = self.client.get(&url);
        if let Some(organism) = organism {
            request = request.query(&[("organism", organism)]);
        }

        let response = request
            .send()
            .await
            .map_err(|err| OutbreakError::new_http_error(err, url.as_str()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = url.as_str(), status = status.as_u16(); "Network request returned an error status");
            return Err(OutbreakError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| OutbreakError::new_http_error(err, url.as_str()))?;
        debug!(bytes = body.len(); "Received network response");

        // The endpoint already filters by organism
        parse_snapshot(&body, None)
    }
}
