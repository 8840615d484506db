//! Content Source: the upstream that supplies résumé records.
//!
//! The rest of the service only sees [`ContentSource`]; which adapter backs it is
//! decided once at startup from [`ContentConfig`](crate::config::ContentConfig).

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ContentConfig;
use crate::models::resume::ResumeBundle;

pub mod file;
pub mod notion;

pub use file::JsonFileSource;
pub use notion::NotionSource;

#[derive(Debug, Error)]
pub enum ContentFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Content API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed content: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Required collection '{0}' is empty")]
    MissingRecord(&'static str),
}

/// Fetches the complete record bundle for one render. Not retried by callers.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self) -> Result<ResumeBundle, ContentFetchError>;
}

/// Builds the configured adapter.
pub fn from_config(config: &ContentConfig) -> anyhow::Result<Arc<dyn ContentSource>> {
    Ok(match config {
        ContentConfig::File(path) => Arc::new(JsonFileSource::new(path.clone())),
        ContentConfig::Notion(settings) => Arc::new(NotionSource::new(settings.clone())?),
    })
}
