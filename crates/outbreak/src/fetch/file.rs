//! JSON snapshot network source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::info;

use outbreak_core::network::Network;

use super::{NetworkSource, parse_snapshot};
use crate::error::OutbreakError;

/// Reads networks from a JSON snapshot file on every fetch.
#[derive(Debug, Clone)]
pub struct FileNetworkSource {
    path: PathBuf,
}

impl FileNetworkSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl NetworkSource for FileNetworkSource {
    async fn fetch(&self, organism: Option<&str>) -> Result<Network, OutbreakError> {
        info!(
            path = self.path.display().to_string(),
            organism:? = organism;
            "Reading transmission network snapshot"
        );

        let source = tokio::fs::read_to_string(&self.path).await?;
        parse_snapshot(&source, organism)
    }
}
