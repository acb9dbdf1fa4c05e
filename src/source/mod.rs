//! Data sources that supply candidate events

pub mod notion;
pub use notion::NotionSource;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::countdown::CandidateRecord;

/// What the countdown asks of a source. Results should come back
/// sorted ascending by date, though callers must not rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateQuery {
    /// Only return events on or after this day
    pub on_or_after: Option<NaiveDate>,
    pub page_size: u32,
    /// Cursor from a previous page's `next_cursor`
    pub start_cursor: Option<String>,
}

/// One page of results from a source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePage {
    pub records: Vec<CandidateRecord>,
    /// Set when more results are available
    pub next_cursor: Option<String>,
}

impl CandidatePage {
    /// A page with nothing after it.
    pub fn last(records: Vec<CandidateRecord>) -> Self {
        Self {
            records,
            next_cursor: None,
        }
    }
}

#[async_trait]
pub trait EventSource: Send + Sync {
    async fn query(&self, query: &CandidateQuery) -> Result<CandidatePage>;
}
