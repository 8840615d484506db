use axum::extract::State;
use maud::Markup;
use tracing::info;

use crate::document::render::resume_page;
use crate::document::view::{PageOptions, ResumeView};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /
///
/// Fetches the résumé content and renders the page. A content failure renders
/// the error page instead; nothing is retried.
pub async fn handle_resume_page(State(state): State<AppState>) -> Result<Markup, AppError> {
    let bundle = state.content.fetch().await?;

    let options = PageOptions {
        static_export: state.config.static_export,
        pdf_url: state.config.pdf_url.as_deref(),
    };
    let view = ResumeView::assemble(&bundle, options);

    info!(
        "Rendering résumé for {} ({} sections)",
        bundle.personal_info.name,
        count_sections(&view)
    );

    Ok(resume_page(&view))
}

fn count_sections(view: &ResumeView<'_>) -> usize {
    [
        view.skills.is_some(),
        view.core_competencies.is_some(),
        view.work.is_some(),
        view.values.is_some(),
        view.other_tools.is_some(),
        view.education.is_some(),
        view.certifications.is_some(),
        view.military_service.is_some(),
    ]
    .into_iter()
    .filter(|rendered| *rendered)
    .count()
        + view.entry_sections.len()
}
