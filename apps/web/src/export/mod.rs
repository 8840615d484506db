// Export Pipeline
// Export Request → Browser Acquirer (with fallback discovery) → Page Loader →
// Layout Mutator → Snapshot Encoder → Response Emitter.
// One export owns exactly one browser process; nothing is pooled or retried.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod browser;
pub mod handlers;
pub mod locator;
pub mod page;
pub mod pipeline;
pub mod snapshot;

pub use pipeline::ChromiumExporter;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Chrome executable not found. Please install Google Chrome or Chromium.")]
    BrowserNotFound,

    #[error("Browser found at {} but it is not executable", .0.display())]
    BrowserNotExecutable(PathBuf),

    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Page {url} did not reach network idle within {}s", .budget.as_secs())]
    PageLoadTimeout { url: String, budget: Duration },

    #[error("Capture failed: {0}")]
    Capture(String),
}

/// The encoded document for one export request.
#[derive(Debug, Clone)]
pub struct PdfExportResult {
    pub bytes: Bytes,
}

impl PdfExportResult {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Captures a rendered page as a PDF.
///
/// Carried in `AppState` as `Arc<dyn DocumentExporter>`.
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export(&self, target_url: &str) -> Result<PdfExportResult, ExportError>;
}
