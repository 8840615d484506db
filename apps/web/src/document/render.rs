//! Page Renderer: turns a [`ResumeView`] into HTML with maud.
//!
//! Print-layout hooks are explicit `data-print` markers rather than structural
//! matches, so the export pipeline never depends on inline styles or copy text:
//! `root` on the content container, `header` on the personal-info header and
//! `hide` on anything that must not appear in the PDF.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::document::text::{split_bullets, TextBlock};
use crate::document::view::ResumeView;
use crate::models::resume::{EntryRecord, PersonalInfo};

pub const PRINT_ROOT: &str = "root";
pub const PRINT_HEADER: &str = "header";
pub const PRINT_HIDE: &str = "hide";

const STYLES: &str = r#"
:root { --background: #fff; --text: #1d1d1f; --muted: #6e6e73; --accent: #0066cc; --space-lg: 2rem; --space-3xl: 6rem; }
* { box-sizing: border-box; }
body { margin: 0; font-family: Pretendard, Inter, -apple-system, sans-serif; color: var(--text); background: var(--background); line-height: 1.6; }
.container { max-width: 960px; margin: 0 auto; padding: var(--space-lg) 1.5rem var(--space-3xl); }
.section { margin-bottom: 3rem; break-inside: avoid-column; }
.flex-between { display: flex; justify-content: space-between; align-items: flex-start; gap: 1rem; }
.text-hero { font-size: 2.5rem; font-weight: 800; margin: 0; }
.text-secondary-title { font-size: 1.25rem; color: var(--muted); margin: 0.25rem 0 1rem; }
.text-section-title { font-size: 1.75rem; font-weight: 700; margin: 0 0 1.5rem; }
.text-subsection-title { font-size: 1.125rem; font-weight: 600; }
.text-details-title { font-size: 1rem; font-weight: 600; margin: 1rem 0 0.25rem; }
.text-meta { color: var(--muted); font-size: 0.9rem; }
.text-pre-line { white-space: pre-line; }
.contact-list { list-style: none; padding: 0; margin: 0 0 1.5rem; }
.work-experience-item { display: grid; grid-template-columns: 1fr 2fr; gap: 1.5rem; margin-bottom: 2rem; }
.entry-item { margin-bottom: 2rem; }
.skill-tags { display: flex; flex-wrap: wrap; gap: 0.5rem; list-style: none; padding: 0; }
.skill-tags li { background: #f2f2f7; border-radius: 6px; padding: 0.1rem 0.6rem; font-size: 0.9rem; }
.entry-links a { margin-right: 0.75rem; color: var(--accent); }
.center-section { text-align: center; }
.pdf-download-button, .pdf-link-button { border: 1px solid var(--accent); color: var(--accent); background: none; border-radius: 8px; padding: 0.5rem 1rem; cursor: pointer; text-decoration: none; font: inherit; }
body.pdf-mode { font-size: 11pt; }
.pdf-mobile-layout .work-experience-item { display: block; }
.personal-info-header .text-hero { font-size: 2rem; }
@media print { .page-break-before { break-before: page; } [data-print="hide"] { display: none !important; } }
"#;

const DOWNLOAD_SCRIPT: &str = r#"
document.getElementById('pdf-download')?.addEventListener('click', async (event) => {
  const button = event.currentTarget;
  button.disabled = true;
  try {
    const response = await fetch('/api/generate-pdf', { method: 'POST' });
    if (!response.ok) {
      const failure = await response.json().catch(() => ({}));
      throw new Error(failure.message || response.statusText);
    }
    const url = URL.createObjectURL(await response.blob());
    const link = document.createElement('a');
    link.href = url;
    link.download = 'resume.pdf';
    link.click();
    URL.revokeObjectURL(url);
  } catch (error) {
    alert('PDF generation failed: ' + error.message);
  } finally {
    button.disabled = false;
  }
});
"#;

/// Call-to-action copy shown under the hosted PDF link.
pub const PDF_PROMPT: &str = "Download this résumé as a PDF";

pub fn page_title(personal: Option<&PersonalInfo>) -> String {
    match personal.filter(|p| !p.name.trim().is_empty()) {
        Some(p) => format!("Developer {} Résumé", p.name),
        None => "Developer Résumé".to_string(),
    }
}

fn page_description(personal: &PersonalInfo) -> String {
    if personal.name.trim().is_empty() {
        return "Developer résumé website".to_string();
    }
    format!("{} {} Résumé", personal.position, personal.name)
        .trim()
        .to_string()
}

fn layout(title: &str, description: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no";
                meta name="description" content=(description);
                title { (title) }
                link rel="preconnect" href="https://cdn.jsdelivr.net";
                link rel="stylesheet" href="https://cdn.jsdelivr.net/gh/orioncactus/pretendard@v1.3.9/dist/web/static/pretendard.min.css";
                style { (PreEscaped(STYLES)) }
            }
            body { (body) }
        }
    }
}

pub fn resume_page(view: &ResumeView<'_>) -> Markup {
    let personal = view.personal;
    let body = html! {
        div.container data-print=(PRINT_ROOT) {
            div.section.personal-info-section {
                div.flex-between data-print=(PRINT_HEADER) {
                    div {
                        h1.text-hero { (personal.name) " Résumé" }
                        p.text-secondary-title { (personal.position) }
                    }
                    @if view.show_download_button {
                        button #pdf-download.pdf-download-button type="button" data-print=(PRINT_HIDE) {
                            "Download PDF"
                        }
                    }
                }
                ul.contact-list {
                    @if let Some(email) = view.contact.email.as_deref().filter(|e| !e.is_empty()) {
                        li { "Email. " a href={ "mailto:" (email) } { (email) } }
                    }
                    @if let Some(phone) = view.contact.phone.as_deref().filter(|p| !p.is_empty()) {
                        li { "Phone. " (phone) }
                    }
                    @if let Some(blog) = &view.contact.blog {
                        li { "Blog. " a href=(blog.url) { (blog.display) } }
                    }
                    @if let Some(github) = &view.contact.github {
                        li { "GitHub. " a href=(github.url) { (github.display) } }
                    }
                }
                @if let Some(intro) = personal.introduction.as_deref().filter(|i| !i.is_empty()) {
                    div.text-body.text-pre-line { (intro) }
                }
            }

            @if let Some(categories) = &view.skills {
                div.section.page-break-before {
                    h2.text-section-title { "Skills." }
                    @for category in categories {
                        div.skill-category {
                            @if category.titled {
                                h3.text-subsection-title { (category.category) }
                            }
                            @for skill in &category.skills {
                                ul.skill-tags {
                                    @for name in &skill.name { li { (name) } }
                                }
                            }
                        }
                    }
                }
            }

            @if let Some(competencies) = &view.core_competencies {
                div.section {
                    h2.text-section-title { "Core Competencies." }
                    @for competency in competencies {
                        div.entry-item {
                            h3.text-subsection-title { (competency.title) }
                            @if let Some(description) = &competency.description {
                                (rich_text(description))
                            }
                        }
                    }
                }
            }

            @if let Some(work) = &view.work {
                div.section {
                    h2.text-section-title { "Work Experience." }
                    @for experience in work {
                        div.work-experience-item {
                            div.work-experience-left {
                                div.text-subsection-title { (experience.summary.company) }
                                div.text-meta { (experience.summary.period) }
                            }
                            div.work-experience-right {
                                div.text-subsection-title { (experience.summary.position) }
                                @if let Some(description) = &experience.summary.description {
                                    div.text-body.text-pre-line { (description) }
                                }
                                @for achievement in &experience.achievements {
                                    div.details-section {
                                        h4.text-details-title { (achievement.title) }
                                        @if let Some(details) = &achievement.details {
                                            (rich_text(details))
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            @for entry_section in &view.entry_sections {
                div.section {
                    h2.text-section-title { (entry_section.heading) }
                    @for entry in &entry_section.entries {
                        (entry_item(entry))
                    }
                }
            }

            @if let Some(values) = &view.values {
                div.section {
                    h2.text-section-title { "Values." }
                    @for value in values {
                        div.entry-item {
                            h3.text-subsection-title { (value.title) }
                            @if let Some(description) = &value.description {
                                (rich_text(description))
                            }
                        }
                    }
                }
            }

            @if let Some(categories) = &view.other_tools {
                div.section {
                    h2.text-section-title { "Tools Beyond Development." }
                    @for category in categories {
                        div.entry-item {
                            h3.text-subsection-title { (category.category) }
                            ul {
                                @for tool in &category.tools {
                                    li {
                                        strong { (tool.title) }
                                        @if !tool.description.is_empty() {
                                            ": " (tool.description)
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            @if let Some(education) = &view.education {
                div.section.page-break-before {
                    h2.text-section-title { "Education." }
                    @for school in education {
                        div.entry-item {
                            h3.text-subsection-title { (school.title) }
                            @if let Some(major) = &school.major { div { (major) } }
                            @if let Some(period) = &school.period { div.text-meta { (period) } }
                            @if let Some(description) = &school.description {
                                (rich_text(description))
                            }
                        }
                    }
                }
            }

            @if let Some(certifications) = &view.certifications {
                div.section {
                    h2.text-section-title { "Certifications & Languages." }
                    @for cert in certifications {
                        div.entry-item {
                            h3.text-subsection-title { (cert.title) }
                            div.text-meta {
                                @if let Some(issuer) = &cert.issuer { (issuer) }
                                @if cert.issuer.is_some() && cert.date.is_some() { " | " }
                                @if let Some(date) = &cert.date { (date) }
                            }
                        }
                    }
                }
            }

            @if let Some(service) = view.military_service {
                div.section {
                    h2.text-section-title { "Military Service." }
                    div.entry-item {
                        h3.text-subsection-title { (service.title.trim()) }
                        @if let Some(period) = &service.period { div.text-meta { (period) } }
                        @if let Some(description) = &service.description {
                            (rich_text(description))
                        }
                    }
                }
            }

            @if let Some(url) = view.pdf_call_to_action {
                div.section.center-section data-print=(PRINT_HIDE) {
                    a.pdf-link-button href=(url) target="_blank" rel="noopener noreferrer" {
                        "Open PDF"
                    }
                    p.text-meta { (PDF_PROMPT) }
                }
            }
        }
        @if view.show_download_button {
            script { (PreEscaped(DOWNLOAD_SCRIPT)) }
        }
    };

    layout(
        &page_title(Some(personal)),
        &page_description(personal),
        body,
    )
}

fn entry_item(entry: &EntryRecord) -> Markup {
    let links = entry.links();
    html! {
        div.entry-item {
            h3.text-subsection-title { (entry.title) }
            @if let Some(period) = &entry.period {
                div.text-meta { (period) }
            }
            @if let Some(description) = &entry.description {
                div.text-body.text-pre-line { (description) }
            }
            @if !entry.skills.is_empty() {
                ul.skill-tags {
                    @for skill in &entry.skills { li { (skill) } }
                }
            }
            @if let Some(details) = &entry.details {
                (rich_text(details))
            }
            @if let Some(remark) = &entry.remark {
                p.text-meta { (remark) }
            }
            @if !links.is_empty() {
                div.entry-links {
                    @for (label, url) in &links {
                        a href=(url) target="_blank" rel="noopener noreferrer" { (label) }
                    }
                }
            }
        }
    }
}

fn rich_text(text: &str) -> Markup {
    html! {
        div.text-body {
            @for block in split_bullets(text) {
                @match block {
                    TextBlock::Paragraph(line) => p { (line) },
                    TextBlock::Bullets(items) => ul {
                        @for item in items { li { (item) } }
                    },
                }
            }
        }
    }
}

/// Standalone page shown when the content source cannot be read.
pub fn error_page(message: &str) -> Markup {
    let body = html! {
        div.container.center-section {
            div.text-hero { "⚠️" }
            h2.text-section-title { "Failed to load résumé data" }
            p.text-body { (message) }
            p.text-meta { "Check that the content source environment variables are set correctly." }
        }
    };
    layout(&page_title(None), "Developer résumé website", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::view::PageOptions;
    use crate::models::resume::{MilitaryServiceRecord, ResumeBundle, Visibility};

    fn bundle() -> ResumeBundle {
        ResumeBundle {
            personal_info: PersonalInfo {
                name: "Kim <Dev>".to_string(),
                position: "Backend Engineer".to_string(),
                github: Some("https://github.com/kim".to_string()),
                ..Default::default()
            },
            projects: vec![
                EntryRecord {
                    title: "Ledger".to_string(),
                    details: Some("- Event sourced\n- Rust".to_string()),
                    show: Visibility::Show,
                    ..Default::default()
                },
                EntryRecord {
                    title: "Secret prototype".to_string(),
                    show: Visibility::Hide,
                    ..Default::default()
                },
            ],
            military_service: Some(MilitaryServiceRecord {
                title: "   ".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_page_renders_visible_content_with_print_markers() {
        let bundle = bundle();
        let html = resume_page(&ResumeView::assemble(&bundle, PageOptions::default())).into_string();

        assert!(html.contains(r#"data-print="root""#));
        assert!(html.contains(r#"data-print="header""#));
        assert!(html.contains(r#"id="pdf-download""#));
        assert!(html.contains("Ledger"));
        assert!(html.contains("<li>Event sourced</li>"));
        assert!(html.contains("github.com/kim</a>"));
        assert!(!html.contains("Secret prototype"));
        assert!(!html.contains("Military Service."));
        assert!(!html.contains(PDF_PROMPT));
    }

    #[test]
    fn test_page_escapes_record_text() {
        let bundle = bundle();
        let html = resume_page(&ResumeView::assemble(&bundle, PageOptions::default())).into_string();
        assert!(html.contains("Kim &lt;Dev&gt;"));
        assert!(!html.contains("Kim <Dev>"));
    }

    #[test]
    fn test_static_export_renders_call_to_action() {
        let bundle = bundle();
        let options = PageOptions {
            static_export: true,
            pdf_url: Some("https://cdn.example.com/resume.pdf"),
        };
        let html = resume_page(&ResumeView::assemble(&bundle, options)).into_string();

        assert!(html.contains(PDF_PROMPT));
        assert!(html.contains("https://cdn.example.com/resume.pdf"));
        assert!(!html.contains(r#"id="pdf-download""#));
    }

    #[test]
    fn test_page_title_falls_back_without_name() {
        assert_eq!(page_title(None), "Developer Résumé");
        let info = PersonalInfo {
            name: "Kim".to_string(),
            ..Default::default()
        };
        assert_eq!(page_title(Some(&info)), "Developer Kim Résumé");
    }

    #[test]
    fn test_error_page_shows_message() {
        let html = error_page("Notion returned 401").into_string();
        assert!(html.contains("Notion returned 401"));
        assert!(html.contains("Failed to load résumé data"));
    }
}
