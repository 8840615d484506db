use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::content::{ContentFetchError, ContentSource};
use crate::models::resume::ResumeBundle;

/// Reads a [`ResumeBundle`] JSON document from disk on every fetch, so edits
/// show up on the next page load without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ContentSource for JsonFileSource {
    async fn fetch(&self) -> Result<ResumeBundle, ContentFetchError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| ContentFetchError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let bundle: ResumeBundle = serde_json::from_slice(&raw)?;
        debug!(
            "Loaded résumé bundle from {} ({} bytes)",
            self.path.display(),
            raw.len()
        );
        Ok(bundle)
    }
}
