use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 3000;

/// Application configuration loaded from environment variables.
/// Fails at startup if the content source is missing or `PORT` is invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// `development` turns on diagnostic traces in export error responses.
    pub app_env: String,
    /// Managed-deployment hostname. When set, the export pipeline loads the
    /// page from `https://<host>/` instead of the loopback address.
    pub deployment_host: Option<String>,
    pub static_export: bool,
    pub pdf_url: Option<String>,
    pub content: ContentConfig,
    /// Bundled serverless Chromium binary, tried before system discovery.
    pub chromium_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum ContentConfig {
    File(PathBuf),
    Notion(NotionSettings),
}

#[derive(Debug, Clone)]
pub struct NotionSettings {
    pub api_key: String,
    pub databases: NotionDatabases,
}

/// Notion database ids per collection. Only personal info is required.
#[derive(Debug, Clone, Default)]
pub struct NotionDatabases {
    pub personal_info: String,
    pub skills: Option<String>,
    pub core_competencies: Option<String>,
    pub work_summaries: Option<String>,
    pub work_achievements: Option<String>,
    pub projects: Option<String>,
    pub portfolio: Option<String>,
    pub awards: Option<String>,
    pub activities: Option<String>,
    pub other_experiences: Option<String>,
    pub values: Option<String>,
    pub other_tools: Option<String>,
    pub education: Option<String>,
    pub certifications: Option<String>,
    pub military_service: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let content = if let Some(path) = get("RESUME_DATA_PATH") {
            ContentConfig::File(PathBuf::from(path))
        } else if let Some(api_key) = get("NOTION_API_KEY") {
            let personal_info = get("NOTION_PERSONAL_INFO_DB").with_context(|| {
                "Required environment variable 'NOTION_PERSONAL_INFO_DB' is not set".to_string()
            })?;
            ContentConfig::Notion(NotionSettings {
                api_key,
                databases: NotionDatabases {
                    personal_info,
                    skills: get("NOTION_SKILL_DB"),
                    core_competencies: get("NOTION_CORE_COMPETENCY_DB"),
                    work_summaries: get("NOTION_WORK_SUMMARY_DB"),
                    work_achievements: get("NOTION_WORK_ACHIEVEMENT_DB"),
                    projects: get("NOTION_PROJECT_DB"),
                    portfolio: get("NOTION_PORTFOLIO_DB"),
                    awards: get("NOTION_AWARD_DB"),
                    activities: get("NOTION_ACTIVITY_DB"),
                    other_experiences: get("NOTION_OTHER_EXPERIENCE_DB"),
                    values: get("NOTION_VALUE_DB"),
                    other_tools: get("NOTION_OTHER_TOOL_DB"),
                    education: get("NOTION_EDUCATION_DB"),
                    certifications: get("NOTION_CERTIFICATION_DB"),
                    military_service: get("NOTION_MILITARY_SERVICE_DB"),
                },
            })
        } else {
            bail!("No content source configured: set RESUME_DATA_PATH or NOTION_API_KEY");
        };

        Ok(Config {
            port,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            app_env: get("APP_ENV").unwrap_or_else(|| "production".to_string()),
            deployment_host: get("DEPLOYMENT_HOST"),
            static_export: get("STATIC_EXPORT").is_some_and(|v| v == "true"),
            pdf_url: get("PDF_URL"),
            content,
            chromium_path: get("CHROMIUM_PATH").map(PathBuf::from),
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }

    /// The page the export pipeline captures.
    pub fn export_target_url(&self) -> String {
        match &self.deployment_host {
            Some(host) => format!("https://{host}/"),
            None => format!("http://localhost:{}/", self.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_file_source() {
        let config = config_from(&[("RESUME_DATA_PATH", "resume.json")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(!config.is_development());
        assert!(!config.static_export);
        assert!(config.pdf_url.is_none());
        assert!(matches!(config.content, ContentConfig::File(_)));
        assert_eq!(config.export_target_url(), "http://localhost:3000/");
    }

    #[test]
    fn test_deployment_host_switches_to_https() {
        let config = config_from(&[
            ("RESUME_DATA_PATH", "resume.json"),
            ("DEPLOYMENT_HOST", "resume.example.app"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.export_target_url(), "https://resume.example.app/");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("RESUME_DATA_PATH", "resume.json"), ("PORT", "http")]);
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_content_source_is_rejected() {
        assert!(config_from(&[]).is_err());
    }

    #[test]
    fn test_notion_requires_personal_info_database() {
        assert!(config_from(&[("NOTION_API_KEY", "secret")]).is_err());

        let config = config_from(&[
            ("NOTION_API_KEY", "secret"),
            ("NOTION_PERSONAL_INFO_DB", "db-personal"),
            ("NOTION_SKILL_DB", "db-skill"),
            ("NOTION_AWARD_DB", ""),
        ])
        .unwrap();
        let ContentConfig::Notion(settings) = config.content else {
            panic!("expected notion content config");
        };
        assert_eq!(settings.databases.skills.as_deref(), Some("db-skill"));
        assert!(settings.databases.awards.is_none());
    }

    #[test]
    fn test_static_export_flag_is_exact() {
        let on = config_from(&[("RESUME_DATA_PATH", "r.json"), ("STATIC_EXPORT", "true")]).unwrap();
        let off = config_from(&[("RESUME_DATA_PATH", "r.json"), ("STATIC_EXPORT", "yes")]).unwrap();
        assert!(on.static_export);
        assert!(!off.static_export);
    }
}
