pub mod config;
pub mod data;
pub mod goal;
pub mod measure;
pub mod stats;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};

/// Parse a date argument as epoch milliseconds.
///
/// Accepts raw epoch milliseconds, `YYYY-MM-DD` (local midnight) or an
/// RFC 3339 timestamp.
pub fn parse_date_ms(s: &str) -> Result<i64, String> {
    if let Ok(ms) = s.parse::<i64>() {
        return Ok(ms);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_time(NaiveTime::MIN);
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .ok_or_else(|| format!("'{s}' has no valid local midnight"));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }
    Err(format!(
        "cannot parse '{s}' as a date (expected epoch millis, YYYY-MM-DD or RFC 3339)"
    ))
}
