mod config;
mod content;
mod document;
mod errors;
mod export;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ContentConfig};
use crate::export::ChromiumExporter;
use crate::routes::build_app;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing content source)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting résumé web v{}", env!("CARGO_PKG_VERSION"));

    // Initialize content source
    let content = content::from_config(&config.content)?;
    match &config.content {
        ContentConfig::File(path) => info!("Content source: JSON file {}", path.display()),
        ContentConfig::Notion(_) => info!("Content source: Notion"),
    }

    // Initialize PDF exporter (bundled Chromium first, then system discovery)
    let exporter = Arc::new(ChromiumExporter::new(config.chromium_path.clone()));
    info!(
        "PDF export target: {} (bundled Chromium: {})",
        config.export_target_url(),
        config
            .chromium_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    if config.static_export {
        info!("Static export mode: PDF call-to-action links to {:?}", config.pdf_url);
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        content,
        exporter,
    };

    // Build router
    let app = build_app(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
