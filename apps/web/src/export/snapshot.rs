//! Snapshot Encoder: prints the mutated page to an A4 PDF.

use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use tracing::info;

use crate::export::{ExportError, PdfExportResult};

const CM_PER_INCH: f64 = 2.54;
const A4_WIDTH_IN: f64 = 21.0 / CM_PER_INCH;
const A4_HEIGHT_IN: f64 = 29.7 / CM_PER_INCH;

fn cm(value: f64) -> f64 {
    value / CM_PER_INCH
}

/// A4 with backgrounds, 2cm top/bottom and 1cm side margins, no header or
/// footer, and the page size left to the print layout rather than CSS.
pub fn print_params() -> PrintToPdfParams {
    PrintToPdfParams {
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        print_background: Some(true),
        margin_top: Some(cm(2.0)),
        margin_bottom: Some(cm(2.0)),
        margin_left: Some(cm(1.0)),
        margin_right: Some(cm(1.0)),
        display_header_footer: Some(false),
        prefer_css_page_size: Some(false),
        ..PrintToPdfParams::default()
    }
}

pub async fn capture(page: &Page) -> Result<PdfExportResult, ExportError> {
    info!("Generating PDF...");
    let bytes = page
        .pdf(print_params())
        .await
        .map_err(|e| ExportError::Capture(format!("print to PDF failed: {e}")))?;

    let result = PdfExportResult::new(bytes);
    if result.is_empty() {
        return Err(ExportError::Capture("browser returned an empty document".to_string()));
    }

    info!("PDF generated successfully, size: {} bytes", result.len());
    Ok(result)
}
