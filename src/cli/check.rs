use anyhow::Result;
use chrono::NaiveDate;

use crate::api::public::ErrorResponse;
use crate::core::{AppConfig, Clock, FixedClock, SystemClock, init_tracing};
use crate::countdown::{self, Lookup};
use crate::source::{EventSource, NotionSource};

pub async fn run(today: Option<NaiveDate>) -> Result<()> {
    init_tracing();
    let config = AppConfig::from_env()?;
    let source = NotionSource::from_config(&config);

    let output = render(&source, &config, resolve_today(today, &config)).await?;
    println!("{}", output);

    Ok(())
}

/// `--today` wins over the system clock.
fn resolve_today(today: Option<NaiveDate>, config: &AppConfig) -> NaiveDate {
    match today {
        Some(day) => FixedClock(day).today(config.timezone),
        None => SystemClock.today(config.timezone),
    }
}

/// Run one lookup and render it the same way the API would.
async fn render(source: &dyn EventSource, config: &AppConfig, today: NaiveDate) -> Result<String> {
    let output = match countdown::lookup(source, config, today).await? {
        Lookup::Found(resp) => serde_json::to_string_pretty(&resp)?,
        other => serde_json::to_string_pretty(&ErrorResponse {
            error: other.not_found_message().unwrap_or_default().to_string(),
        })?,
    };
    Ok(output)
}
