use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/generate-pdf
///
/// Captures the rendered résumé page as an A4 PDF. The request body is ignored.
pub async fn handle_generate_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    info!("PDF generation started");
    let target_url = state.config.export_target_url();

    let result = state
        .exporter
        .export(&target_url)
        .await
        .map_err(|e| AppError::export(e, state.config.is_development()))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"resume.pdf\""),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        result.bytes,
    )
        .into_response())
}

/// OPTIONS /api/generate-pdf
pub async fn handle_generate_pdf_preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}
