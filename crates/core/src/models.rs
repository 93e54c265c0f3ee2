use chrono::{DateTime, NaiveDateTime, Utc};

use crate::errors::{SesplanError, SesplanResult};

pub mod availability;
pub mod session;
pub mod slot;
pub mod user;

/// Parses an ISO-8601 timestamp from the API.
///
/// The backend serializes UTC datetimes either with an offset
/// (`2024-05-01T18:00:00Z`, `2024-05-01T18:00:00+00:00`) or without one
/// (`2024-05-01T18:00:00`). Offset-less values are taken as UTC.
pub fn parse_timestamp(value: &str) -> SesplanResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map(|naive| naive.and_utc())
        .map_err(|e| SesplanError::Parse(format!("invalid timestamp {:?}: {}", value, e)))
}

/// Formats a UTC instant the way the API expects it in request bodies and queries.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
