//! Picks the next event on or after today from a list of candidates

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use super::models::{CandidateRecord, SelectedEvent};

/// Parse a start value into wall clock time in `tz`.
///
/// Accepts a bare date (`2024-03-05`), an RFC 3339 timestamp with an
/// offset, or a timestamp without an offset which is read as local to
/// `tz`. A bare date is never shifted between zones.
pub fn parse_start(raw: &str, tz: Tz) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&tz).naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Select the earliest event whose calendar day is today or later.
///
/// Records without a parsable date or a non-blank title are skipped.
/// Input order is irrelevant: ties on the same day go to the earlier
/// start time, then to the lexically smaller title.
pub fn select_next_event(
    records: &[CandidateRecord],
    today: NaiveDate,
    tz: Tz,
) -> Option<SelectedEvent> {
    records
        .iter()
        .filter_map(|record| {
            let Some(title) = record.title.as_deref().filter(|t| !t.trim().is_empty()) else {
                tracing::debug!("Skipping record without a title: {:?}", record);
                return None;
            };
            let Some(starts_at) = record.date_start.as_deref().and_then(|s| parse_start(s, tz))
            else {
                tracing::debug!("Skipping record without a usable date: {:?}", record);
                return None;
            };
            Some((starts_at, title))
        })
        .filter(|(starts_at, _)| starts_at.date() >= today)
        .min()
        .map(|(starts_at, title)| SelectedEvent {
            date: starts_at.date(),
            title: title.to_string(),
        })
}
