use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::content::ContentFetchError;
use crate::document::render::error_page;
use crate::export::ExportError;

/// Stable label carried by every export failure response.
pub const EXPORT_FAILURE_LABEL: &str = "PDF generation failed";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rendered as a page-level message instead of the résumé.
    #[error("Content fetch error: {0}")]
    ContentFetch(#[from] ContentFetchError),

    /// `include_trace` is only set in development so internals stay private.
    #[error("PDF generation failed: {source}")]
    Export {
        #[source]
        source: ExportError,
        include_trace: bool,
    },
}

impl AppError {
    pub fn export(source: ExportError, include_trace: bool) -> Self {
        AppError::Export {
            source,
            include_trace,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::ContentFetch(e) => {
                tracing::error!("Failed to fetch résumé content: {e}");
                (StatusCode::BAD_GATEWAY, error_page(&e.to_string())).into_response()
            }
            AppError::Export {
                source,
                include_trace,
            } => {
                tracing::error!("PDF generation failed: {source}");
                tracing::debug!("PDF generation failure detail: {source:?}");

                let mut body = json!({
                    "error": EXPORT_FAILURE_LABEL,
                    "message": source.to_string(),
                });
                if include_trace {
                    body["details"] = json!(format!("{source:#?}"));
                }

                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn timeout() -> ExportError {
        ExportError::PageLoadTimeout {
            url: "http://localhost:3000/".to_string(),
            budget: Duration::from_secs(30),
        }
    }

    #[tokio::test]
    async fn test_export_error_omits_trace_outside_development() {
        let response = AppError::export(timeout(), false).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "PDF generation failed");
        assert!(body["message"].as_str().unwrap().contains("network idle"));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_export_error_includes_trace_in_development() {
        let body = body_json(AppError::export(ExportError::BrowserNotFound, true).into_response()).await;
        assert!(body["details"].as_str().unwrap().contains("BrowserNotFound"));
    }

    #[tokio::test]
    async fn test_content_fetch_error_renders_page() {
        let err = AppError::ContentFetch(ContentFetchError::MissingRecord("personal_info"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("personal_info"));
    }
}
