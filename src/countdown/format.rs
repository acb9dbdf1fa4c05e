use chrono::NaiveDate;

use super::models::{Countdown, SelectedEvent};

/// Turn the selected event into the widget payload.
///
/// Both operands are calendar days so the difference is exact; there
/// is no partial day to round. A negative difference can only come
/// from a caller bypassing the selector and is reported as zero days.
pub fn format_result(event: &SelectedEvent, today: NaiveDate) -> Countdown {
    let diff_days = event.date.signed_duration_since(today).num_days();

    if diff_days == 0 {
        Countdown::today(event.title.clone())
    } else {
        Countdown::days(diff_days.max(0).unsigned_abs(), event.title.clone())
    }
}
