//! Time utilities: parsing HH:MM, epoch conversions, formatting durations, etc.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime};
use serde::Serializer;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t.trim(), "%H:%M:%S"))
        .ok()
}

/// Parse a UTC offset such as `+08:00`, `-05:30` or `Z`.
pub fn parse_offset(s: &str) -> AppResult<FixedOffset> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("z") || t.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| AppError::InvalidOffset(s.to_string()));
    }

    t.parse::<FixedOffset>()
        .map_err(|_| AppError::InvalidOffset(s.to_string()))
}

/// Epoch milliseconds → wall-clock instant in the organisation's offset.
pub fn from_epoch_ms(ms: i64, tz: FixedOffset) -> AppResult<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.with_timezone(&tz).naive_local())
        .ok_or_else(|| AppError::InvalidTimestamp(ms.to_string()))
}

/// Wall-clock instant in the organisation's offset → epoch milliseconds.
pub fn to_epoch_ms(dt: NaiveDateTime, tz: FixedOffset) -> AppResult<i64> {
    dt.and_local_timezone(tz)
        .single()
        .map(|d| d.timestamp_millis())
        .ok_or_else(|| AppError::InvalidTimestamp(dt.to_string()))
}

/// Duration as decimal hours with two digits, e.g. `3.00`.
pub fn format_hours(d: Duration) -> String {
    format!("{:.2}", d.num_minutes() as f64 / 60.0)
}

pub fn serialize_minutes<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(d.num_minutes())
}
