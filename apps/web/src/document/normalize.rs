//! Record Normalizer: reshapes flat records into the grouped shapes the page renders.
//!
//! Hidden records are dropped before grouping. Groups keep first-seen order and
//! a key never produces more than one group.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::resume::{Displayable, OtherToolRecord, PersonalInfo, SkillRecord};

/// Label used for tools without a category.
pub const DEFAULT_TOOL_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCategory {
    pub category: String,
    /// False when `category` was synthesised because the record had no title.
    #[serde(skip)]
    pub titled: bool,
    pub skills: Vec<SkillItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillItem {
    pub name: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCategory {
    pub category: String,
    pub tools: Vec<ToolItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolItem {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkDisplay {
    pub url: String,
    pub display: String,
}

/// Display-ready contact fields. `blog` and `github` are absent, not null,
/// when the source field is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<LinkDisplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<LinkDisplay>,
}

/// Groups visible skill records by `title`. A record without a title gets a
/// key derived from its position so untitled rows never collapse together.
pub fn group_skills(records: &[SkillRecord]) -> Vec<SkillCategory> {
    let keyed = records
        .iter()
        .filter(|r| r.is_shown())
        .enumerate()
        .map(|(index, record)| {
            let (key, titled) = match record.title.as_deref().filter(|t| !t.is_empty()) {
                Some(title) => (title.to_string(), true),
                None => (format!("no-title-{index}"), false),
            };
            let item = SkillItem {
                name: record.skills.clone(),
                summary: String::new(),
            };
            (key, (titled, item))
        });

    group_first_seen(keyed)
        .into_iter()
        .map(|(category, items)| SkillCategory {
            category,
            titled: items.first().is_some_and(|(titled, _)| *titled),
            skills: items.into_iter().map(|(_, item)| item).collect(),
        })
        .collect()
}

/// Groups visible tool records by `category`, defaulting to [`DEFAULT_TOOL_CATEGORY`].
pub fn group_tools(records: &[OtherToolRecord]) -> Vec<ToolCategory> {
    let keyed = records.iter().filter(|r| r.is_shown()).map(|record| {
        let key = record
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_TOOL_CATEGORY)
            .to_string();
        let item = ToolItem {
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
        };
        (key, item)
    });

    group_first_seen(keyed)
        .into_iter()
        .map(|(category, tools)| ToolCategory { category, tools })
        .collect()
}

pub fn contact_info(info: &PersonalInfo) -> ContactInfo {
    ContactInfo {
        email: info.email.clone(),
        phone: info.phone.clone(),
        blog: link_display(info.website.as_deref()),
        github: link_display(info.github.as_deref()),
    }
}

fn link_display(url: Option<&str>) -> Option<LinkDisplay> {
    let url = url.filter(|u| !u.is_empty())?;
    Some(LinkDisplay {
        url: url.to_string(),
        display: url.replacen("https://", "", 1),
    })
}

fn group_first_seen<T>(items: impl IntoIterator<Item = (String, T)>) -> Vec<(String, Vec<T>)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();

    for (key, item) in items {
        match positions.get(&key) {
            Some(&pos) => groups[pos].1.push(item),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }

    groups
}
