use std::env;

use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub notion_token: String,
    pub notion_database_id: String,
    pub notion_api_url: String,
    pub notion_version: String,
    // Names of the database properties holding the event date and title
    pub date_property: String,
    pub title_property: String,
    pub untitled_placeholder: String,
    pub page_size: u32,
    // Ask the database to drop past events before they reach the selector
    pub prefilter: bool,
    pub timezone: Tz,
}

impl AppConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup so it can be
    /// constructed without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("Missing env var {}", key))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or(default.to_string());

        let notion_token = required("NOTION_TOKEN")?;
        let notion_database_id = required("NOTION_DATABASE_ID")?;
        let notion_api_url = or_default("COUNTDOWN_NOTION_API_URL", "https://api.notion.com")
            .trim_end_matches('/')
            .to_string();
        let notion_version = or_default("COUNTDOWN_NOTION_VERSION", "2022-06-28");
        let date_property = or_default("COUNTDOWN_DATE_PROPERTY", "日付");
        let title_property = or_default("COUNTDOWN_TITLE_PROPERTY", "名前");
        let untitled_placeholder = or_default("COUNTDOWN_UNTITLED", "タイトルなし");

        let page_size: u32 = or_default("COUNTDOWN_PAGE_SIZE", "10")
            .parse()
            .context("COUNTDOWN_PAGE_SIZE must be a positive integer")?;
        // Notion caps a single query page at 100 results
        if !(1..=100).contains(&page_size) {
            anyhow::bail!("COUNTDOWN_PAGE_SIZE must be between 1 and 100, got {}", page_size);
        }

        let prefilter = parse_bool(&or_default("COUNTDOWN_PREFILTER", "true"))
            .context("COUNTDOWN_PREFILTER must be true or false")?;

        let timezone_name = or_default("COUNTDOWN_TIMEZONE", "UTC");
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|e| anyhow!("Invalid COUNTDOWN_TIMEZONE {}: {}", timezone_name, e))?;

        Ok(Self {
            notion_token,
            notion_database_id,
            notion_api_url,
            notion_version,
            date_property,
            title_property,
            untitled_placeholder,
            page_size,
            prefilter,
            timezone,
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Not a boolean: {}", other),
    }
}
