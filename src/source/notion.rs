//! Notion database client for listing dated pages

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CandidatePage, CandidateQuery, EventSource};
use crate::core::AppConfig;
use crate::countdown::CandidateRecord;

#[derive(Debug, Serialize)]
struct QueryDatabaseRequest<'a> {
    page_size: u32,
    sorts: Vec<Sort<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<DateFilter<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Sort<'a> {
    property: &'a str,
    direction: &'static str,
}

#[derive(Debug, Serialize)]
struct DateFilter<'a> {
    property: &'a str,
    date: DateCondition,
}

#[derive(Debug, Serialize)]
struct DateCondition {
    // Formatted as YYYY-MM-DD so the comparison is by day
    on_or_after: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryDatabaseResponse {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    pub id: Option<String>,
    // Kept untyped since every property type has its own shape and only
    // two of them are ever read
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct DateValue {
    start: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RichText {
    #[serde(default)]
    plain_text: String,
}

pub struct NotionSource {
    client: Client,
    api_url: String,
    token: String,
    version: String,
    database_id: String,
    date_property: String,
    title_property: String,
    untitled_placeholder: String,
}

impl NotionSource {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.notion_api_url.clone(),
            token: config.notion_token.clone(),
            version: config.notion_version.clone(),
            database_id: config.notion_database_id.clone(),
            date_property: config.date_property.clone(),
            title_property: config.title_property.clone(),
            untitled_placeholder: config.untitled_placeholder.clone(),
        }
    }

    fn request_body<'a>(&'a self, query: &'a CandidateQuery) -> QueryDatabaseRequest<'a> {
        QueryDatabaseRequest {
            page_size: query.page_size,
            sorts: vec![Sort {
                property: &self.date_property,
                direction: "ascending",
            }],
            filter: query.on_or_after.map(|day| DateFilter {
                property: &self.date_property,
                date: DateCondition {
                    on_or_after: day.format("%Y-%m-%d").to_string(),
                },
            }),
            start_cursor: query.start_cursor.as_deref(),
        }
    }

    /// Map a page onto a candidate. Missing or oddly shaped properties
    /// become `None` and are left for the selector to discard.
    fn to_record(&self, page: &Page) -> CandidateRecord {
        let date_start = page
            .properties
            .get(&self.date_property)
            .and_then(|prop| prop.get("date"))
            .and_then(|date| serde_json::from_value::<DateValue>(date.clone()).ok())
            .and_then(|date| date.start);

        let title = page
            .properties
            .get(&self.title_property)
            .and_then(|prop| prop.get("title"))
            .and_then(|title| serde_json::from_value::<Vec<RichText>>(title.clone()).ok())
            .map(|parts| {
                let text: String = parts.into_iter().map(|p| p.plain_text).collect();
                if text.trim().is_empty() {
                    self.untitled_placeholder.clone()
                } else {
                    text
                }
            });

        if date_start.is_none() || title.is_none() {
            tracing::debug!("Page {:?} is missing a date or title property", page.id);
        }

        CandidateRecord { date_start, title }
    }
}

#[async_trait]
impl EventSource for NotionSource {
    async fn query(&self, query: &CandidateQuery) -> Result<CandidatePage> {
        let url = format!("{}/v1/databases/{}/query", self.api_url, self.database_id);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
            .json(&self.request_body(query))
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Notion query failed: {} ({})", status, text);
        }

        let resp: QueryDatabaseResponse =
            serde_json::from_str(&text).context("Unexpected response from Notion")?;
        let next_cursor = if resp.has_more { resp.next_cursor } else { None };

        Ok(CandidatePage {
            records: resp.results.iter().map(|page| self.to_record(page)).collect(),
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn test_config(api_url: &str) -> AppConfig {
        AppConfig {
            notion_token: String::from("test-token"),
            notion_database_id: String::from("db123"),
            notion_api_url: api_url.to_string(),
            notion_version: String::from("2022-06-28"),
            date_property: String::from("日付"),
            title_property: String::from("名前"),
            untitled_placeholder: String::from("タイトルなし"),
            page_size: 10,
            prefilter: true,
            timezone: chrono_tz::UTC,
        }
    }

    fn page(date: Value, title: Value) -> Value {
        json!({
            "object": "page",
            "id": "page-1",
            "properties": {
                "日付": {"id": "a", "type": "date", "date": date},
                "名前": {"id": "title", "type": "title", "title": title}
            }
        })
    }

    #[test]
    fn test_request_body_with_filter() {
        let source = NotionSource::from_config(&test_config("http://localhost"));
        let query = CandidateQuery {
            on_or_after: NaiveDate::from_ymd_opt(2024, 3, 1),
            page_size: 10,
            ..Default::default()
        };
        let body = serde_json::to_value(source.request_body(&query)).unwrap();
        assert_eq!(
            body,
            json!({
                "page_size": 10,
                "sorts": [{"property": "日付", "direction": "ascending"}],
                "filter": {"property": "日付", "date": {"on_or_after": "2024-03-01"}}
            })
        );
    }

    #[test]
    fn test_request_body_without_filter() {
        let source = NotionSource::from_config(&test_config("http://localhost"));
        let query = CandidateQuery {
            on_or_after: None,
            page_size: 25,
            ..Default::default()
        };
        let body = serde_json::to_value(source.request_body(&query)).unwrap();
        assert!(body.get("filter").is_none());
        assert_eq!(body["page_size"], 25);
    }

    #[test]
    fn test_request_body_with_cursor() {
        let source = NotionSource::from_config(&test_config("http://localhost"));
        let query = CandidateQuery {
            page_size: 10,
            start_cursor: Some(String::from("cur2")),
            ..Default::default()
        };
        let body = serde_json::to_value(source.request_body(&query)).unwrap();
        assert_eq!(body["start_cursor"], "cur2");
    }

    #[test]
    fn test_to_record() {
        let source = NotionSource::from_config(&test_config("http://localhost"));

        let full: Page = serde_json::from_value(page(
            json!({"start": "2024-03-05", "end": null, "time_zone": null}),
            json!([{"plain_text": "Launch "}, {"plain_text": "day"}]),
        ))
        .unwrap();
        assert_eq!(
            source.to_record(&full),
            CandidateRecord::new("2024-03-05", "Launch day")
        );

        let untitled: Page =
            serde_json::from_value(page(json!({"start": "2024-03-05"}), json!([]))).unwrap();
        assert_eq!(
            source.to_record(&untitled),
            CandidateRecord::new("2024-03-05", "タイトルなし")
        );

        let no_date: Page =
            serde_json::from_value(page(Value::Null, json!([{"plain_text": "X"}]))).unwrap();
        assert_eq!(source.to_record(&no_date).date_start, None);

        let bare: Page = serde_json::from_value(json!({"id": "p", "properties": {}})).unwrap();
        assert_eq!(source.to_record(&bare), CandidateRecord::default());
    }

    #[tokio::test]
    async fn test_query() {
        let mut server = mockito::Server::new_async().await;
        let mock_resp = json!({
            "object": "list",
            "results": [
                page(json!({"start": "2024-03-01T08:00:00.000+00:00"}), json!([{"plain_text": "A"}])),
                page(json!({"start": "2024-03-05"}), json!([{"plain_text": "B"}]))
            ],
            "has_more": false,
            "next_cursor": null
        });
        let mock = server
            .mock("POST", "/v1/databases/db123/query")
            .match_header("authorization", "Bearer test-token")
            .match_header("notion-version", "2022-06-28")
            .match_body(Matcher::PartialJson(json!({
                "page_size": 10,
                "filter": {"property": "日付", "date": {"on_or_after": "2024-03-01"}}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_resp.to_string())
            .create_async()
            .await;

        let source = NotionSource::from_config(&test_config(&server.url()));
        let fetched = source
            .query(&CandidateQuery {
                on_or_after: NaiveDate::from_ymd_opt(2024, 3, 1),
                page_size: 10,
                ..Default::default()
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(fetched.next_cursor, None);
        assert_eq!(
            fetched.records,
            vec![
                CandidateRecord::new("2024-03-01T08:00:00.000+00:00", "A"),
                CandidateRecord::new("2024-03-05", "B"),
            ]
        );
    }

    #[tokio::test]
    async fn test_query_returns_next_cursor() {
        let mut server = mockito::Server::new_async().await;
        let _first = server
            .mock("POST", "/v1/databases/db123/query")
            .match_body(Matcher::PartialJson(json!({"page_size": 2})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "object": "list",
                    "results": [
                        page(json!({"start": "2023-01-01"}), json!([{"plain_text": "Old1"}])),
                        page(json!({"start": "2023-02-01"}), json!([{"plain_text": "Old2"}]))
                    ],
                    "has_more": true,
                    "next_cursor": "cur2"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let source = NotionSource::from_config(&test_config(&server.url()));
        let fetched = source
            .query(&CandidateQuery {
                page_size: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(fetched.records.len(), 2);
        assert_eq!(fetched.next_cursor, Some(String::from("cur2")));
    }

    #[tokio::test]
    async fn test_query_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/databases/db123/query")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"object": "error", "code": "unauthorized"}"#)
            .create_async()
            .await;

        let source = NotionSource::from_config(&test_config(&server.url()));
        let err = source
            .query(&CandidateQuery {
                on_or_after: None,
                page_size: 10,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_query_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/databases/db123/query")
            .with_status(200)
            .with_body(r#"{"object": "list"}"#)
            .create_async()
            .await;

        let source = NotionSource::from_config(&test_config(&server.url()));
        let result = source
            .query(&CandidateQuery {
                on_or_after: None,
                page_size: 10,
                ..Default::default()
            })
            .await;
        assert!(result.is_err());
    }
}
