use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::export::browser::{acquire, ChromiumLauncher, ExportSession, Launcher};
use crate::export::locator::{ExecutableProbe, Platform, SystemProbe};
use crate::export::page::LOAD_BUDGET;
use crate::export::{DocumentExporter, ExportError, PdfExportResult};

/// Exports through a freshly launched headless browser per request.
pub struct ChromiumExporter<L = ChromiumLauncher> {
    launcher: L,
    bundled: Option<PathBuf>,
    platform: Platform,
    probe: Arc<dyn ExecutableProbe>,
    load_budget: Duration,
}

impl ChromiumExporter {
    pub fn new(bundled: Option<PathBuf>) -> Self {
        Self::with_launcher(ChromiumLauncher, bundled, Platform::current(), Arc::new(SystemProbe))
    }
}

impl<L: Launcher> ChromiumExporter<L> {
    pub fn with_launcher(
        launcher: L,
        bundled: Option<PathBuf>,
        platform: Platform,
        probe: Arc<dyn ExecutableProbe>,
    ) -> Self {
        Self {
            launcher,
            bundled,
            platform,
            probe,
            load_budget: LOAD_BUDGET,
        }
    }
}

#[async_trait]
impl<L> DocumentExporter for ChromiumExporter<L>
where
    L: Launcher,
    L::Session: ExportSession,
{
    async fn export(&self, target_url: &str) -> Result<PdfExportResult, ExportError> {
        let started = Instant::now();

        let session = acquire(
            &self.launcher,
            self.bundled.as_deref(),
            &self.platform,
            self.probe.as_ref(),
        )
        .await?;

        // Close on every path, success or failure, before the outcome is returned.
        let outcome = session.render(target_url, self.load_budget).await;
        session.close().await;

        match &outcome {
            Ok(result) => info!(
                "PDF export completed: {} bytes in {}ms",
                result.len(),
                started.elapsed().as_millis()
            ),
            Err(e) => warn!(
                "PDF export failed after {}ms: {e}",
                started.elapsed().as_millis()
            ),
        }
        outcome
    }
}
