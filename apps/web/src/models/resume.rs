//! Typed résumé records as delivered by a [`ContentSource`](crate::content::ContentSource).
//!
//! Every collection record carries a [`Visibility`] flag. Records are immutable
//! for the duration of one render.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Visibility
// ────────────────────────────────────────────────────────────────────────────

/// The `show` flag on a record. Only the literal `"show"` makes a record visible;
/// `"hide"`, any other value, null and a missing field all hide it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Visibility {
    Show,
    #[default]
    Hide,
}

impl From<Option<String>> for Visibility {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            Some("show") => Visibility::Show,
            _ => Visibility::Hide,
        }
    }
}

impl From<Visibility> for String {
    fn from(v: Visibility) -> Self {
        match v {
            Visibility::Show => "show".to_string(),
            Visibility::Hide => "hide".to_string(),
        }
    }
}

/// Shared capability of every collection record.
pub trait Displayable {
    fn visibility(&self) -> Visibility;

    fn is_shown(&self) -> bool {
        self.visibility() == Visibility::Show
    }
}

macro_rules! displayable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Displayable for $ty {
                fn visibility(&self) -> Visibility {
                    self.show
                }
            }
        )+
    };
}

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub position: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub github: Option<String>,
    pub introduction: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillRecord {
    pub title: Option<String>,
    pub skills: Vec<String>,
    pub show: Visibility,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreCompetencyRecord {
    pub title: String,
    pub description: Option<String>,
    pub show: Visibility,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkSummaryRecord {
    pub company: String,
    pub position: String,
    pub period: String,
    pub description: Option<String>,
    pub show: Visibility,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkAchievementRecord {
    pub company: String,
    pub title: String,
    pub details: Option<String>,
    pub show: Visibility,
}

/// Shared shape of project, portfolio, award, activity and other-experience entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryRecord {
    pub title: String,
    pub description: Option<String>,
    pub period: Option<String>,
    pub skills: Vec<String>,
    pub details: Option<String>,
    pub remark: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub ios: Option<String>,
    pub android: Option<String>,
    pub post: Option<String>,
    pub show: Visibility,
}

impl EntryRecord {
    /// Non-empty outbound links in display order, labelled for rendering.
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("GitHub", &self.github),
            ("Website", &self.website),
            ("iOS", &self.ios),
            ("Android", &self.android),
            ("Post", &self.post),
        ]
        .into_iter()
        .filter_map(|(label, url)| {
            url.as_deref()
                .filter(|u| !u.trim().is_empty())
                .map(|u| (label, u))
        })
        .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueRecord {
    pub title: String,
    pub description: Option<String>,
    pub show: Visibility,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherToolRecord {
    pub category: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub show: Visibility,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationRecord {
    pub title: String,
    pub major: Option<String>,
    pub period: Option<String>,
    pub description: Option<String>,
    pub show: Visibility,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationRecord {
    pub title: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub show: Visibility,
}

/// Singleton record; it has no `show` flag; its `title` decides visibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MilitaryServiceRecord {
    pub title: String,
    pub period: Option<String>,
    pub description: Option<String>,
}

displayable!(
    SkillRecord,
    CoreCompetencyRecord,
    WorkSummaryRecord,
    WorkAchievementRecord,
    EntryRecord,
    ValueRecord,
    OtherToolRecord,
    EducationRecord,
    CertificationRecord,
);

/// Everything one render needs, as returned by a single content fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeBundle {
    pub personal_info: PersonalInfo,
    pub skills: Vec<SkillRecord>,
    pub core_competencies: Vec<CoreCompetencyRecord>,
    pub work_summaries: Vec<WorkSummaryRecord>,
    pub work_achievements: Vec<WorkAchievementRecord>,
    pub projects: Vec<EntryRecord>,
    pub portfolio: Vec<EntryRecord>,
    pub awards: Vec<EntryRecord>,
    pub activities: Vec<EntryRecord>,
    pub other_experiences: Vec<EntryRecord>,
    pub values: Vec<ValueRecord>,
    pub other_tools: Vec<OtherToolRecord>,
    pub education: Vec<EducationRecord>,
    pub certifications: Vec<CertificationRecord>,
    pub military_service: Option<MilitaryServiceRecord>,
}
