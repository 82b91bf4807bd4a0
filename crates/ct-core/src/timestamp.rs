//! Timestamp parsing shared by worklog entries and calendar events.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Format used by the issue tracker for worklog start times, e.g.
/// `2024-01-02T09:30:00.000+0100`.
const TRACKER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Errors raised while parsing upstream date and time values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A timestamp was not in any accepted format.
    #[error("invalid timestamp {value:?}, expected ISO 8601 with a UTC offset")]
    Timestamp { value: String },

    /// An all-day date was not `YYYY-MM-DD`.
    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    Date { value: String },

    /// A calendar event boundary carried neither a date nor a timestamp.
    #[error("event {field} has neither `dateTime` nor `date`")]
    MissingEventTime { field: &'static str },
}

/// Parses an offset-aware timestamp.
///
/// Accepts RFC 3339 (`2024-01-02T09:30:00+01:00`) and the tracker's compact
/// offset form (`2024-01-02T09:30:00.000+0100`). The original offset is kept.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, TRACKER_TIMESTAMP_FORMAT))
        .map_err(|_| ParseError::Timestamp {
            value: value.to_string(),
        })
}

/// Parses a date-only value as midnight UTC.
pub fn parse_all_day(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ParseError::Date {
        value: value.to_string(),
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

/// Serde adapter for [`parse_timestamp`].
pub(crate) fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
