//! Countdown to the next dated event
//!
//! Candidates are fetched from an [`EventSource`], narrowed to the next
//! event on or after today by [`select_next_event`] and turned into the
//! widget payload by [`format_result`].

mod format;
mod models;
mod select;

pub use format::format_result;
pub use models::{CandidateRecord, Countdown, SelectedEvent, Status};
pub use select::{parse_start, select_next_event};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::core::AppConfig;
use crate::source::{CandidateQuery, EventSource};

/// Upper bound on pages read for one lookup
pub const MAX_PAGES: usize = 50;

pub const NO_CANDIDATES_MESSAGE: &str = "No upcoming pages found";
pub const NONE_QUALIFYING_MESSAGE: &str = "No valid future or today events found";

/// Outcome of a single countdown lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The source returned nothing at all
    NoCandidates,
    /// The source returned records but none are usable and on or after today
    NoneQualifying,
    Found(Countdown),
}

impl Lookup {
    /// Message shown to callers when there is nothing to count down to.
    pub fn not_found_message(&self) -> Option<&'static str> {
        match self {
            Lookup::NoCandidates => Some(NO_CANDIDATES_MESSAGE),
            Lookup::NoneQualifying => Some(NONE_QUALIFYING_MESSAGE),
            Lookup::Found(_) => None,
        }
    }
}

/// Build the first query sent to the source for `today`.
///
/// The date filter starts a day early. A bare date filter is compared
/// in UTC upstream, so an event earlier today in a zone ahead of UTC
/// falls on the previous UTC day. The selector drops anything that
/// really is in the past.
pub fn candidate_query(config: &AppConfig, today: NaiveDate) -> CandidateQuery {
    CandidateQuery {
        on_or_after: config
            .prefilter
            .then(|| today.pred_opt().unwrap_or(today)),
        page_size: config.page_size,
        start_cursor: None,
    }
}

/// Read pages from the source until the next event is known.
///
/// Without a date filter every page is read since the answer can be on
/// any of them. With the filter, results are sorted ascending so the
/// first page that yields a qualifying event ends the scan.
async fn fetch_candidates(
    source: &dyn EventSource,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<Vec<CandidateRecord>> {
    let mut query = candidate_query(config, today);
    let mut records = Vec::new();

    for page_number in 1..=MAX_PAGES {
        let page = source
            .query(&query)
            .await
            .context("Failed to fetch candidate events")?;
        records.extend(page.records);

        let Some(cursor) = page.next_cursor else {
            return Ok(records);
        };
        if query.on_or_after.is_some()
            && select_next_event(&records, today, config.timezone).is_some()
        {
            return Ok(records);
        }
        if page_number == MAX_PAGES {
            tracing::warn!(
                "Stopped after {} pages with more results remaining",
                MAX_PAGES
            );
            break;
        }
        query.start_cursor = Some(cursor);
    }

    Ok(records)
}

/// Fetch candidates and compute the countdown relative to `today`.
///
/// The source may or may not honor the date filter and sort order; the
/// selector re-validates every record either way.
pub async fn lookup(
    source: &dyn EventSource,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<Lookup> {
    let records = fetch_candidates(source, config, today).await?;

    if records.is_empty() {
        tracing::info!("Source returned no candidates for {}", today);
        return Ok(Lookup::NoCandidates);
    }

    let Some(event) = select_next_event(&records, today, config.timezone) else {
        tracing::info!(
            "None of {} candidates is on or after {}",
            records.len(),
            today
        );
        return Ok(Lookup::NoneQualifying);
    };

    tracing::debug!("Next event is {:?}", event);
    Ok(Lookup::Found(format_result(&event, today)))
}
