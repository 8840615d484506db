//! Browser Acquirer: launches the bundled serverless Chromium, or falls back
//! to a browser discovered on the host.
//!
//! The acquired [`BrowserSession`] is a scoped resource: [`BrowserSession::close`]
//! consumes it, and dropping an unclosed session kills the process.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::export::locator::{locate_executable, ExecutableProbe, Platform};
use crate::export::page::{apply_print_layout, load, LOAD_BUDGET};
use crate::export::snapshot::capture;
use crate::export::{ExportError, PdfExportResult};

/// Flags for the bundled serverless build.
pub const BUNDLED_ARGS: &[&str] = &[
    "--allow-pre-commit-input",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-breakpad",
    "--disable-client-side-phishing-detection",
    "--disable-component-update",
    "--disable-default-apps",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-hang-monitor",
    "--disable-ipc-flooding-protection",
    "--disable-popup-blocking",
    "--disable-prompt-on-repost",
    "--disable-renderer-backgrounding",
    "--disable-sync",
    "--disable-setuid-sandbox",
    "--disable-site-isolation-trials",
    "--export-tagged-pdf",
    "--font-render-hinting=none",
    "--force-color-profile=srgb",
    "--hide-scrollbars",
    "--in-process-gpu",
    "--metrics-recording-only",
    "--mute-audio",
    "--no-default-browser-check",
    "--no-first-run",
    "--no-pings",
    "--no-sandbox",
    "--no-zygote",
    "--password-store=basic",
    "--single-process",
    "--use-gl=angle",
    "--use-angle=swiftshader",
    "--use-mock-keychain",
];

/// Hardened flags for a system browser in a constrained environment.
pub const SYSTEM_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-web-security",
    "--disable-features=VizDisplayCompositor",
];

pub const BUNDLED_VIEWPORT: (u32, u32) = (1920, 1080);

const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// CDP command timeout. Kept above [`LOAD_BUDGET`] so a hanging navigation
/// surfaces as a load timeout rather than a failed command.
pub const CDP_REQUEST_TIMEOUT: Duration = Duration::from_secs(LOAD_BUDGET.as_secs() + 15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOrigin {
    Bundled,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub viewport: Option<(u32, u32)>,
    pub origin: LaunchOrigin,
}

impl LaunchSpec {
    pub fn bundled(executable: &Path) -> Self {
        Self {
            executable: executable.to_path_buf(),
            args: BUNDLED_ARGS.iter().map(|a| a.to_string()).collect(),
            viewport: Some(BUNDLED_VIEWPORT),
            origin: LaunchOrigin::Bundled,
        }
    }

    pub fn system(executable: PathBuf) -> Self {
        Self {
            executable,
            args: SYSTEM_ARGS.iter().map(|a| a.to_string()).collect(),
            viewport: None,
            origin: LaunchOrigin::System,
        }
    }
}

/// Starts a headless browser process from a [`LaunchSpec`].
#[async_trait]
pub trait Launcher: Send + Sync {
    type Session: Send;

    async fn launch(&self, spec: &LaunchSpec) -> Result<Self::Session, ExportError>;
}

/// A launched browser that can print one page and must then be closed.
#[async_trait]
pub trait ExportSession: Send + Sync + Sized {
    async fn render(&self, url: &str, budget: Duration) -> Result<PdfExportResult, ExportError>;

    /// Releases the browser. Consumes the session, so it runs at most once.
    async fn close(self);
}

/// Step 1: the bundled binary. Step 2 (only if step 1 fails for any reason):
/// locate a system browser. Step 3: launch it with [`SYSTEM_ARGS`].
pub async fn acquire<L: Launcher>(
    launcher: &L,
    bundled: Option<&Path>,
    platform: &Platform,
    probe: &dyn ExecutableProbe,
) -> Result<L::Session, ExportError> {
    match bundled {
        Some(path) => match launcher.launch(&LaunchSpec::bundled(path)).await {
            Ok(session) => {
                info!("Using bundled Chromium at {}", path.display());
                return Ok(session);
            }
            Err(e) => warn!("Bundled Chromium failed, falling back to system Chrome: {e}"),
        },
        None => debug!("No bundled Chromium configured, falling back to system Chrome"),
    }

    let executable = locate_executable(platform, probe).ok_or(ExportError::BrowserNotFound)?;
    if !probe.is_executable(&executable) {
        return Err(ExportError::BrowserNotExecutable(executable));
    }

    let session = launcher.launch(&LaunchSpec::system(executable.clone())).await?;
    info!("Using system Chrome at {}", executable.display());
    Ok(session)
}

// ────────────────────────────────────────────────────────────────────────────
// chromiumoxide launcher
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumLauncher;

#[async_trait]
impl Launcher for ChromiumLauncher {
    type Session = BrowserSession;

    async fn launch(&self, spec: &LaunchSpec) -> Result<BrowserSession, ExportError> {
        let builder = BrowserConfig::builder()
            .chrome_executable(&spec.executable)
            .request_timeout(CDP_REQUEST_TIMEOUT)
            .args(spec.args.iter().map(String::as_str));

        let builder = match spec.viewport {
            Some((width, height)) => builder.window_size(width, height).viewport(Viewport {
                width,
                height,
                ..Viewport::default()
            }),
            None => builder.viewport(None),
        };

        let config = builder.build().map_err(ExportError::BrowserLaunch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ExportError::BrowserLaunch(e.to_string()))?;

        // The CDP connection only makes progress while its handler is polled.
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {e}");
                }
            }
        });

        Ok(BrowserSession {
            browser: Some(browser),
            events,
            executable: spec.executable.clone(),
            origin: spec.origin,
        })
    }
}

/// One browser process, owned by one export request.
pub struct BrowserSession {
    browser: Option<Browser>,
    events: JoinHandle<()>,
    pub executable: PathBuf,
    pub origin: LaunchOrigin,
}

impl BrowserSession {
    pub async fn new_page(&self) -> Result<Page, ExportError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ExportError::Capture("browser session already closed".to_string()))?;
        browser
            .new_page("about:blank")
            .await
            .map_err(|e| ExportError::Capture(format!("could not open page: {e}")))
    }
}

#[async_trait]
impl ExportSession for BrowserSession {
    async fn render(&self, url: &str, budget: Duration) -> Result<PdfExportResult, ExportError> {
        let page = self.new_page().await?;
        load(&page, url, budget).await?;
        apply_print_layout(&page).await?;
        capture(&page).await
    }

    /// Closes the browser and waits for the process to exit.
    async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            match tokio::time::timeout(CLOSE_GRACE, browser.close()).await {
                Ok(Ok(_)) => {
                    if let Err(e) = browser.wait().await {
                        warn!("Browser process did not exit cleanly: {e}");
                    }
                }
                Ok(Err(e)) => {
                    warn!("Browser close failed, killing process: {e}");
                    let _ = browser.kill().await;
                }
                Err(_) => {
                    warn!("Browser close timed out, killing process");
                    let _ = browser.kill().await;
                }
            }
            debug!(
                "Browser closed ({:?} at {})",
                self.origin,
                self.executable.display()
            );
        }
        self.events.abort();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.events.abort();
        if let Some(mut browser) = self.browser.take() {
            warn!("Browser session dropped without close; killing process");
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                runtime.spawn(async move {
                    let _ = browser.kill().await;
                });
            }
        }
    }
}
