//! Assembles a [`ResumeView`]: the normalized, filtered shape the renderer
//! walks. A section field that is `None` does not render.

use crate::document::normalize::{contact_info, group_skills, group_tools, ContactInfo, SkillCategory, ToolCategory};
use crate::document::visibility::{any_shown, military_service, pdf_call_to_action, section, shown};
use crate::models::resume::{
    CertificationRecord, CoreCompetencyRecord, Displayable, EducationRecord, EntryRecord,
    MilitaryServiceRecord, PersonalInfo, ResumeBundle, ValueRecord, WorkAchievementRecord,
    WorkSummaryRecord,
};

/// Boundary configuration that affects page assembly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageOptions<'a> {
    pub static_export: bool,
    pub pdf_url: Option<&'a str>,
}

#[derive(Debug)]
pub struct WorkExperience<'a> {
    pub summary: &'a WorkSummaryRecord,
    pub achievements: Vec<&'a WorkAchievementRecord>,
}

#[derive(Debug)]
pub struct EntrySection<'a> {
    pub heading: &'static str,
    pub entries: Vec<&'a EntryRecord>,
}

#[derive(Debug)]
pub struct ResumeView<'a> {
    pub personal: &'a PersonalInfo,
    pub contact: ContactInfo,
    /// The live download button is only useful when this process can export.
    pub show_download_button: bool,
    pub skills: Option<Vec<SkillCategory>>,
    pub core_competencies: Option<Vec<&'a CoreCompetencyRecord>>,
    pub work: Option<Vec<WorkExperience<'a>>>,
    /// Projects, portfolio, awards, activities and other experience, in page order.
    pub entry_sections: Vec<EntrySection<'a>>,
    pub values: Option<Vec<&'a ValueRecord>>,
    pub other_tools: Option<Vec<ToolCategory>>,
    pub education: Option<Vec<&'a EducationRecord>>,
    pub certifications: Option<Vec<&'a CertificationRecord>>,
    pub military_service: Option<&'a MilitaryServiceRecord>,
    pub pdf_call_to_action: Option<&'a str>,
}

impl<'a> ResumeView<'a> {
    pub fn assemble(bundle: &'a ResumeBundle, options: PageOptions<'a>) -> Self {
        let entry_sections = [
            ("Projects.", &bundle.projects),
            ("Portfolio.", &bundle.portfolio),
            ("Awards.", &bundle.awards),
            ("Activities.", &bundle.activities),
            ("Other Experience.", &bundle.other_experiences),
        ]
        .into_iter()
        .filter_map(|(heading, records)| {
            section(records).map(|entries| EntrySection { heading, entries })
        })
        .collect();

        ResumeView {
            personal: &bundle.personal_info,
            contact: contact_info(&bundle.personal_info),
            show_download_button: !options.static_export,
            skills: any_shown(&bundle.skills).then(|| group_skills(&bundle.skills)),
            core_competencies: section(&bundle.core_competencies),
            work: work_experience(&bundle.work_summaries, &bundle.work_achievements),
            entry_sections,
            values: section(&bundle.values),
            other_tools: any_shown(&bundle.other_tools).then(|| group_tools(&bundle.other_tools)),
            education: section(&bundle.education),
            certifications: section(&bundle.certifications),
            military_service: military_service(bundle.military_service.as_ref()),
            pdf_call_to_action: pdf_call_to_action(options.static_export, options.pdf_url),
        }
    }
}

/// The work section spans two collections: it renders when either has a
/// visible record, and each visible summary carries the visible achievements
/// recorded against the same company.
fn work_experience<'a>(
    summaries: &'a [WorkSummaryRecord],
    achievements: &'a [WorkAchievementRecord],
) -> Option<Vec<WorkExperience<'a>>> {
    if !any_shown(summaries) && !any_shown(achievements) {
        return None;
    }

    Some(
        shown(summaries)
            .into_iter()
            .map(|summary| WorkExperience {
                summary,
                achievements: achievements
                    .iter()
                    .filter(|a| a.is_shown() && a.company == summary.company)
                    .collect(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{SkillRecord, Visibility};

    fn entry(title: &str, show: Visibility) -> EntryRecord {
        EntryRecord {
            title: title.to_string(),
            show,
            ..Default::default()
        }
    }

    fn bundle() -> ResumeBundle {
        ResumeBundle {
            personal_info: PersonalInfo {
                name: "Kim".to_string(),
                position: "Backend Engineer".to_string(),
                ..Default::default()
            },
            skills: vec![SkillRecord {
                title: Some("Backend".to_string()),
                skills: vec!["Rust".to_string()],
                show: Visibility::Show,
            }],
            projects: vec![entry("Visible", Visibility::Show), entry("Draft", Visibility::Hide)],
            awards: vec![entry("Old award", Visibility::Hide)],
            ..Default::default()
        }
    }

    #[test]
    fn test_hidden_only_sections_are_absent() {
        let bundle = bundle();
        let view = ResumeView::assemble(&bundle, PageOptions::default());

        assert!(view.skills.is_some());
        assert!(view.core_competencies.is_none());
        assert!(view.work.is_none());
        assert_eq!(view.entry_sections.len(), 1);
        assert_eq!(view.entry_sections[0].heading, "Projects.");
        assert_eq!(view.entry_sections[0].entries.len(), 1);
        assert_eq!(view.entry_sections[0].entries[0].title, "Visible");
    }

    #[test]
    fn test_work_section_pairs_achievements_by_company() {
        let mut bundle = bundle();
        bundle.work_summaries = vec![
            WorkSummaryRecord {
                company: "Acme".to_string(),
                show: Visibility::Show,
                ..Default::default()
            },
            WorkSummaryRecord {
                company: "Globex".to_string(),
                show: Visibility::Hide,
                ..Default::default()
            },
        ];
        bundle.work_achievements = vec![
            WorkAchievementRecord {
                company: "Acme".to_string(),
                title: "Shipped billing".to_string(),
                show: Visibility::Show,
                ..Default::default()
            },
            WorkAchievementRecord {
                company: "Acme".to_string(),
                title: "Internal only".to_string(),
                show: Visibility::Hide,
                ..Default::default()
            },
            WorkAchievementRecord {
                company: "Globex".to_string(),
                title: "Hidden company".to_string(),
                show: Visibility::Show,
                ..Default::default()
            },
        ];

        let view = ResumeView::assemble(&bundle, PageOptions::default());
        let work = view.work.unwrap();
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].summary.company, "Acme");
        assert_eq!(work[0].achievements.len(), 1);
        assert_eq!(work[0].achievements[0].title, "Shipped billing");
    }

    #[test]
    fn test_work_section_eligible_from_achievements_alone() {
        let mut bundle = bundle();
        bundle.work_achievements = vec![WorkAchievementRecord {
            company: "Acme".to_string(),
            title: "Orphan".to_string(),
            show: Visibility::Show,
            ..Default::default()
        }];

        let view = ResumeView::assemble(&bundle, PageOptions::default());
        assert!(view.work.is_some_and(|w| w.is_empty()));
    }

    #[test]
    fn test_static_export_swaps_download_button_for_call_to_action() {
        let bundle = bundle();
        let live = ResumeView::assemble(&bundle, PageOptions::default());
        assert!(live.show_download_button);
        assert!(live.pdf_call_to_action.is_none());

        let exported = ResumeView::assemble(
            &bundle,
            PageOptions {
                static_export: true,
                pdf_url: Some("https://cdn.example.com/resume.pdf"),
            },
        );
        assert!(!exported.show_download_button);
        assert_eq!(
            exported.pdf_call_to_action,
            Some("https://cdn.example.com/resume.pdf")
        );
    }
}
