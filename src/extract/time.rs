use super::ExtractError;
use crate::sparkify_store::TimeRow;
use chrono::{DateTime, Datelike, Timelike, Utc};

pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn timestamp_from_millis(ts_ms: i64) -> Result<DateTime<Utc>, ExtractError> {
    DateTime::from_timestamp_millis(ts_ms).ok_or(ExtractError::InvalidTimestamp(ts_ms))
}

pub fn format_start_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(START_TIME_FORMAT).to_string()
}

/// Build the time dimension row of a millisecond epoch timestamp, in UTC.
///
/// `weekday` counts from Monday = "0" to Sunday = "6".
pub fn time_row_from_millis(ts_ms: i64) -> Result<TimeRow, ExtractError> {
    let timestamp = timestamp_from_millis(ts_ms)?;
    Ok(TimeRow {
        start_time: format_start_time(&timestamp),
        hour: timestamp.hour(),
        day: timestamp.day(),
        week: timestamp.iso_week().week(),
        month: timestamp.month(),
        year: timestamp.year(),
        weekday: timestamp.weekday().num_days_from_monday().to_string(),
    })
}
