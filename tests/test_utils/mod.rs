//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{Router, body::Body};
use chrono::NaiveDate;

use days_until::api::AppState;
use days_until::api::app;
use days_until::core::{AppConfig, FixedClock};
use days_until::countdown::CandidateRecord;
use days_until::source::{CandidatePage, CandidateQuery, EventSource};

/// Source returning a fixed set of records, or an error.
pub struct StaticSource {
    records: Vec<CandidateRecord>,
    fail: bool,
}

impl StaticSource {
    pub fn new(records: Vec<CandidateRecord>) -> Self {
        Self {
            records,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            records: vec![],
            fail: true,
        }
    }
}

#[async_trait]
impl EventSource for StaticSource {
    async fn query(&self, _query: &CandidateQuery) -> Result<CandidatePage> {
        if self.fail {
            return Err(anyhow!("database exploded with secret details"));
        }
        Ok(CandidatePage::last(self.records.clone()))
    }
}

pub fn test_config(notion_api_url: &str) -> AppConfig {
    AppConfig {
        notion_token: String::from("test-token"),
        notion_database_id: String::from("db123"),
        notion_api_url: notion_api_url.to_string(),
        notion_version: String::from("2022-06-28"),
        date_property: String::from("日付"),
        title_property: String::from("名前"),
        untitled_placeholder: String::from("タイトルなし"),
        page_size: 10,
        prefilter: true,
        timezone: chrono_tz::UTC,
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Creates a test application router backed by `source` with the
/// clock pinned to `today`.
pub fn test_app_with(
    source: Arc<dyn EventSource>,
    config: AppConfig,
    today: NaiveDate,
) -> Router {
    let app_state = AppState::new(source, Arc::new(FixedClock(today)), config);
    app(Arc::new(app_state))
}

pub fn test_app(records: Vec<CandidateRecord>, today: &str) -> Router {
    test_app_with(
        Arc::new(StaticSource::new(records)),
        test_config("http://localhost"),
        date(today),
    )
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}
