use std::sync::Arc;

use crate::config::Config;
use crate::content::ContentSource;
use crate::export::DocumentExporter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upstream résumé content. Default: Notion, or a JSON file when `RESUME_DATA_PATH` is set.
    pub content: Arc<dyn ContentSource>,
    /// Captures the rendered page as a PDF. Default: `ChromiumExporter`.
    pub exporter: Arc<dyn DocumentExporter>,
}
