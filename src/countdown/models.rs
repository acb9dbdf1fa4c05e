use chrono::NaiveDate;
use serde::Serialize;

/// A potential event as returned by the data source. Either field may
/// be missing or malformed; the selector decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRecord {
    pub date_start: Option<String>,
    pub title: Option<String>,
}

impl CandidateRecord {
    pub fn new(date_start: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date_start: Some(date_start.into()),
            title: Some(title.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedEvent {
    pub date: NaiveDate,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Today,
}

/// Response payload for the countdown widget.
///
/// Serializes to `{"status": "today", "title": ...}` on the day of the
/// event and `{"days": N, "title": ...}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Countdown {
    Today { status: Status, title: String },
    Days { days: u64, title: String },
}

impl Countdown {
    pub fn today(title: impl Into<String>) -> Self {
        Self::Today {
            status: Status::Today,
            title: title.into(),
        }
    }

    pub fn days(days: u64, title: impl Into<String>) -> Self {
        Self::Days {
            days,
            title: title.into(),
        }
    }
}
