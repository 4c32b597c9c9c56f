use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};

use crate::config;

fn app_time_zone() -> Tz {
    config::current_time_zone()
}

pub fn session_end(start: DateTime<Utc>, duration_minutes: u32) -> DateTime<Utc> {
    start + Duration::minutes(i64::from(duration_minutes))
}

fn clock_label(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%I:%M %p").to_string()
}

/// `"09:00 AM - 10:30 AM"` in `tz`; only the start when there is no duration.
pub fn format_session_time_range(start: DateTime<Utc>, duration_minutes: u32, tz: Tz) -> String {
    if duration_minutes == 0 {
        return clock_label(start, tz);
    }
    let end = session_end(start, duration_minutes);
    format!("{} - {}", clock_label(start, tz), clock_label(end, tz))
}

pub fn format_session_time_range_in_app_tz(start: DateTime<Utc>, duration_minutes: u32) -> String {
    format_session_time_range(start, duration_minutes, app_time_zone())
}

pub fn format_session_date(start: DateTime<Utc>, tz: Tz) -> String {
    start.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

/// Parses RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) or a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Parses a wall-clock `HH:MM[:SS[.f]]`.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Same calendar day as `date` (UTC), at `clock`.
pub fn at_clock_time(date: DateTime<Utc>, clock: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.date_naive().and_time(clock))
}

pub fn deserialize_clock_time<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_clock_time(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {raw}"))),
    }
}
