//! Page Loader & Layout Mutator.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::{EventLifecycleEvent, SetLifecycleEventsEnabledParams};
use chromiumoxide::Page;
use futures::{Stream, StreamExt};
use tracing::{debug, info};

use crate::document::render::{PRINT_HEADER, PRINT_HIDE, PRINT_ROOT};
use crate::export::ExportError;

/// Hard navigation budget; exceeding it fails the export without a retry.
pub const LOAD_BUDGET: Duration = Duration::from_secs(30);

/// Navigates `page` to `url` and waits until the network is idle.
pub async fn load(page: &Page, url: &str, budget: Duration) -> Result<(), ExportError> {
    page.execute(SetLifecycleEventsEnabledParams::new(true))
        .await
        .map_err(|e| navigation(url, e))?;
    let events = page
        .event_listener::<EventLifecycleEvent>()
        .await
        .map_err(|e| navigation(url, e))?;
    let names = events.map(|event| event.name.clone());

    info!("Loading page: {url}");
    within_budget(url, budget, async {
        page.goto(url).await.map_err(|e| navigation(url, e))?;
        settle(url, names).await
    })
    .await?;
    info!("Page loaded successfully");
    Ok(())
}

async fn within_budget<F>(url: &str, budget: Duration, work: F) -> Result<(), ExportError>
where
    F: Future<Output = Result<(), ExportError>>,
{
    tokio::time::timeout(budget, work)
        .await
        .unwrap_or_else(|_| {
            Err(ExportError::PageLoadTimeout {
                url: url.to_string(),
                budget,
            })
        })
}

async fn settle<S: Stream<Item = String>>(url: &str, events: S) -> Result<(), ExportError> {
    if wait_for_network_idle(events).await {
        Ok(())
    } else {
        Err(navigation(url, "lifecycle events ended before network idle"))
    }
}

/// Resolves once a `networkIdle` lifecycle event follows an `init` (a new
/// document). Chromium emits `networkIdle` after 500ms with no requests in
/// flight. Returns false if the stream ends first.
pub async fn wait_for_network_idle<S: Stream<Item = String>>(events: S) -> bool {
    let mut events = std::pin::pin!(events);
    let mut document_started = false;

    while let Some(name) = events.next().await {
        debug!("Lifecycle event: {name}");
        match name.as_str() {
            "init" => document_started = true,
            "networkIdle" if document_started => return true,
            _ => {}
        }
    }
    false
}

fn navigation(url: &str, e: impl Display) -> ExportError {
    ExportError::Navigation {
        url: url.to_string(),
        message: e.to_string(),
    }
}

/// Forces the print-oriented layout inside the loaded page. Only touches the
/// page's live DOM, and running it twice changes nothing further.
pub fn print_layout_script() -> String {
    format!(
        r#"(() => {{
    document.body.classList.add('pdf-mode');
    const root = document.querySelector('[data-print="{PRINT_ROOT}"]');
    if (root) {{
        root.classList.add('pdf-mobile-layout');
        root.style.columnCount = '2';
        root.style.columnGap = '3rem';
        root.style.columnFill = 'auto';
    }}
    const header = document.querySelector('[data-print="{PRINT_HEADER}"]');
    if (header) {{
        header.classList.add('personal-info-header');
    }}
    document.querySelectorAll('[data-print="{PRINT_HIDE}"]').forEach((el) => {{
        el.style.display = 'none';
    }});
    return true;
}})()"#
    )
}

pub async fn apply_print_layout(page: &Page) -> Result<(), ExportError> {
    page.evaluate(print_layout_script())
        .await
        .map_err(|e| ExportError::Capture(format!("layout mutation failed: {e}")))?;
    debug!("PDF mode activated with two-column layout and hidden download controls");
    Ok(())
}
