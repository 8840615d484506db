pub mod health;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::document::handlers::handle_resume_page;
use crate::export::handlers::{handle_generate_pdf, handle_generate_pdf_preflight};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route("/health", get(health::health_handler))
        // Document assembly
        .route("/", get(handle_resume_page))
        .layer(page_cors());

    // The export route answers its own preflight, so no CorsLayer wraps it.
    let export = Router::new().route(
        "/api/generate-pdf",
        post(handle_generate_pdf).options(handle_generate_pdf_preflight),
    );

    pages.merge(export).with_state(state)
}

/// The full HTTP stack served by the binary.
pub fn build_app(state: AppState) -> Router {
    build_router(state).layer(TraceLayer::new_for_http())
}

fn page_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::content::{ContentFetchError, ContentSource};
    use crate::export::{DocumentExporter, ExportError, PdfExportResult};
    use crate::models::resume::{PersonalInfo, ResumeBundle, ValueRecord, Visibility};

    struct StubContent {
        fail: bool,
    }

    #[async_trait]
    impl ContentSource for StubContent {
        async fn fetch(&self) -> Result<ResumeBundle, ContentFetchError> {
            if self.fail {
                return Err(ContentFetchError::Api {
                    status: 401,
                    message: "API token is invalid.".to_string(),
                });
            }
            Ok(ResumeBundle {
                personal_info: PersonalInfo {
                    name: "Kim".to_string(),
                    position: "Backend Engineer".to_string(),
                    ..Default::default()
                },
                values: vec![
                    ValueRecord {
                        title: "Ownership".to_string(),
                        description: None,
                        show: Visibility::Show,
                    },
                    ValueRecord {
                        title: "Hidden value".to_string(),
                        description: None,
                        show: Visibility::Hide,
                    },
                ],
                ..Default::default()
            })
        }
    }

    enum StubOutcome {
        Pdf,
        NeverIdle,
    }

    struct StubExporter {
        outcome: StubOutcome,
    }

    #[async_trait]
    impl DocumentExporter for StubExporter {
        async fn export(&self, target_url: &str) -> Result<PdfExportResult, ExportError> {
            match self.outcome {
                StubOutcome::Pdf => Ok(PdfExportResult::new(b"%PDF-1.7\n%stub".to_vec())),
                StubOutcome::NeverIdle => Err(ExportError::PageLoadTimeout {
                    url: target_url.to_string(),
                    budget: Duration::from_secs(30),
                }),
            }
        }
    }

    fn app(fail_content: bool, outcome: StubOutcome, development: bool) -> Router {
        let mut env = vec![("RESUME_DATA_PATH", "unused.json")];
        if development {
            env.push(("APP_ENV", "development"));
        }
        let config = Config::from_lookup(|key| {
            env.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap();

        build_app(AppState {
            config,
            content: Arc::new(StubContent { fail: fail_content }),
            exporter: Arc::new(StubExporter { outcome }),
        })
    }

    async fn send(app: Router, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn send_cross_origin(app: Router, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ORIGIN, "https://portfolio.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_resume_page_renders_visible_records() {
        let response = send(app(false, StubOutcome::Pdf, false), Method::GET, "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("Kim Résumé"));
        assert!(html.contains("Ownership"));
        assert!(!html.contains("Hidden value"));
    }

    #[tokio::test]
    async fn test_resume_page_content_failure_shows_message() {
        let response = send(app(true, StubOutcome::Pdf, false), Method::GET, "/").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("API token is invalid."));
        assert!(!html.contains(r#"data-print="root""#));
    }

    #[tokio::test]
    async fn test_generate_pdf_returns_attachment() {
        let response = send(
            app(false, StubOutcome::Pdf, false),
            Method::POST,
            "/api/generate-pdf",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
        assert!(!body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_generate_pdf_timeout_is_structured_500() {
        let response = send(
            app(false, StubOutcome::NeverIdle, false),
            Method::POST,
            "/api/generate-pdf",
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"], "PDF generation failed");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("http://localhost:3000/"));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_generate_pdf_failure_has_trace_in_development() {
        let response = send(
            app(false, StubOutcome::NeverIdle, true),
            Method::POST,
            "/api/generate-pdf",
        )
        .await;
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(body["details"]
            .as_str()
            .unwrap()
            .contains("PageLoadTimeout"));
    }

    #[tokio::test]
    async fn test_preflight_allows_any_origin() {
        let response = send_cross_origin(
            app(false, StubOutcome::Pdf, false),
            Method::OPTIONS,
            "/api/generate-pdf",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert_eq!(headers.get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN).iter().count(), 1);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_cross_origin_pdf_post_is_allowed() {
        let response = send_cross_origin(
            app(false, StubOutcome::Pdf, false),
            Method::POST,
            "/api/generate-pdf",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_page_routes_carry_cors_headers() {
        let response = send_cross_origin(app(false, StubOutcome::Pdf, false), Method::GET, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(app(false, StubOutcome::Pdf, false), Method::GET, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-web");
    }
}
