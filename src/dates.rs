use anyhow::Result;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

const SHORT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Parse a short calendar date into local midnight, expressed in UTC.
/// Accepts `YYYY-MM-DD`, `MM/DD/YY` and `MM/DD/YYYY`.
pub fn parse_short_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let date = SHORT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid date: {input}. Use YYYY-MM-DD or MM/DD/YY"))?;

    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid date: {input}"))?;

    // A DST gap at midnight has no local instant; fall back to UTC midnight.
    let local = Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc());
    Ok(local)
}

/// Oldest transaction date used when none is given on the command line.
pub fn default_lower_bound(now: DateTime<Utc>, lookback_days: i64) -> DateTime<Utc> {
    now - Duration::days(lookback_days)
}

/// Format a playback position as `HH:MM:SS`; hours wrap at 24.
pub fn format_playback_time(seconds: i64) -> String {
    let s = seconds % 60;
    let m = (seconds / 60) % 60;
    let h = (seconds / 3600) % 24;
    format!("{h:02}:{m:02}:{s:02}")
}
