//! Notion adapter: each résumé collection lives in its own Notion database.
//!
//! Page properties are flattened into a plain JSON object keyed by the
//! snake_cased property name and then deserialised into the typed records,
//! so a database column named `Show` lands in the record's `show` field.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::config::NotionSettings;
use crate::content::{ContentFetchError, ContentSource};
use crate::models::resume::{MilitaryServiceRecord, PersonalInfo, ResumeBundle};

const NOTION_API_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<NotionPage>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NotionPage {
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct NotionError {
    message: String,
}

#[derive(Clone)]
pub struct NotionSource {
    client: Client,
    settings: NotionSettings,
}

impl NotionSource {
    pub fn new(settings: NotionSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client, settings })
    }

    /// Returns every row of a database as flattened property maps, following
    /// `has_more` / `next_cursor` pagination.
    async fn query_rows(&self, database_id: &str) -> Result<Vec<Map<String, Value>>, ContentFetchError> {
        let url = format!("{NOTION_API_URL}/databases/{database_id}/query");
        let mut rows = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let Some(c) = &cursor {
                body["start_cursor"] = Value::String(c.clone());
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.settings.api_key)
                .header("Notion-Version", NOTION_VERSION)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<NotionError>(&text)
                    .map(|e| e.message)
                    .unwrap_or(text);
                return Err(ContentFetchError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let page: QueryResponse = response.json().await?;
            rows.extend(page.results.iter().map(|p| flatten_properties(&p.properties)));

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        debug!("Notion database {database_id}: {} rows", rows.len());
        Ok(rows)
    }

    /// Unconfigured collections are empty rather than an error.
    async fn collection<T: DeserializeOwned>(
        &self,
        database_id: Option<&str>,
    ) -> Result<Vec<T>, ContentFetchError> {
        let Some(id) = database_id else {
            return Ok(Vec::new());
        };
        self.query_rows(id)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(Value::Object(row)).map_err(ContentFetchError::from))
            .collect()
    }

    async fn personal_info(&self) -> Result<PersonalInfo, ContentFetchError> {
        let mut rows: Vec<PersonalInfo> = self
            .collection(Some(self.settings.databases.personal_info.as_str()))
            .await?;
        if rows.is_empty() {
            return Err(ContentFetchError::MissingRecord("personal_info"));
        }
        Ok(rows.swap_remove(0))
    }

    async fn military_service(&self) -> Result<Option<MilitaryServiceRecord>, ContentFetchError> {
        let rows: Vec<MilitaryServiceRecord> = self
            .collection(self.settings.databases.military_service.as_deref())
            .await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl ContentSource for NotionSource {
    async fn fetch(&self) -> Result<ResumeBundle, ContentFetchError> {
        let db = &self.settings.databases;

        let (
            personal_info,
            skills,
            core_competencies,
            work_summaries,
            work_achievements,
            projects,
            portfolio,
            awards,
            activities,
            other_experiences,
            values,
            other_tools,
            education,
            certifications,
            military_service,
        ) = tokio::try_join!(
            self.personal_info(),
            self.collection(db.skills.as_deref()),
            self.collection(db.core_competencies.as_deref()),
            self.collection(db.work_summaries.as_deref()),
            self.collection(db.work_achievements.as_deref()),
            self.collection(db.projects.as_deref()),
            self.collection(db.portfolio.as_deref()),
            self.collection(db.awards.as_deref()),
            self.collection(db.activities.as_deref()),
            self.collection(db.other_experiences.as_deref()),
            self.collection(db.values.as_deref()),
            self.collection(db.other_tools.as_deref()),
            self.collection(db.education.as_deref()),
            self.collection(db.certifications.as_deref()),
            self.military_service(),
        )?;

        info!("Fetched résumé content from Notion for {}", personal_info.name);

        Ok(ResumeBundle {
            personal_info,
            skills,
            core_competencies,
            work_summaries,
            work_achievements,
            projects,
            portfolio,
            awards,
            activities,
            other_experiences,
            values,
            other_tools,
            education,
            certifications,
            military_service,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Property flattening
// ────────────────────────────────────────────────────────────────────────────

/// Flattens a Notion `properties` object. Empty values are dropped so that
/// record defaults apply instead of a `null` reaching a non-optional field.
fn flatten_properties(properties: &Map<String, Value>) -> Map<String, Value> {
    properties
        .iter()
        .filter_map(|(name, prop)| {
            let value = property_value(prop);
            (!value.is_null()).then(|| (snake_case(name), value))
        })
        .collect()
}

fn property_value(prop: &Value) -> Value {
    let Some(kind) = prop.get("type").and_then(Value::as_str) else {
        return Value::Null;
    };
    let inner = &prop[kind];

    match kind {
        "title" | "rich_text" => {
            let text: String = inner
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|span| span.get("plain_text").and_then(Value::as_str))
                .collect();
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text)
            }
        }
        "select" | "status" => inner.get("name").cloned().unwrap_or(Value::Null),
        "multi_select" => Value::Array(
            inner
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|opt| opt.get("name").cloned())
                .collect(),
        ),
        "url" | "email" | "phone_number" | "number" | "checkbox" => inner.clone(),
        "date" => date_value(inner),
        "formula" => {
            let formula_kind = inner.get("type").and_then(Value::as_str).unwrap_or("");
            match formula_kind {
                "date" => date_value(&inner["date"]),
                "" => Value::Null,
                other => inner.get(other).cloned().unwrap_or(Value::Null),
            }
        }
        _ => Value::Null,
    }
}

/// Renders a date property as `start` or `start ~ end`.
fn date_value(date: &Value) -> Value {
    let start = date.get("start").and_then(Value::as_str);
    let end = date.get("end").and_then(Value::as_str);
    match (start, end) {
        (Some(s), Some(e)) => Value::String(format!("{s} ~ {e}")),
        (Some(s), None) => Value::String(s.to_string()),
        _ => Value::Null,
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}
