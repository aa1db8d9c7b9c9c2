use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, NaiveDate};

/// Lifetime of a per-day rate limit record.
pub const SECONDS_PER_DAY: u64 = 60 * 60 * 24;

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Current calendar date on the server-local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
