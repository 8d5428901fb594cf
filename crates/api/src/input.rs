// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parsing of request fields that arrive as text.
//!
//! Timestamps are RFC 3339. A bare `YYYY-MM-DD` is accepted wherever a
//! timestamp is expected and means midnight UTC on that date.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use flightline_domain::weekday_from_index;
use thiserror::Error;

/// A request field that could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("'{value}' is not an RFC 3339 timestamp or YYYY-MM-DD date")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("'{value}' is not a YYYY-MM-DD date")]
    InvalidDate { field: &'static str, value: String },

    #[error("'{value}' is not an HH:MM time")]
    InvalidTime { field: &'static str, value: String },

    /// Weekdays are numbered from Sunday (0) through Saturday (6).
    #[error("Weekday must be between 0 (Sunday) and 6 (Saturday), got {value}")]
    InvalidWeekday { field: &'static str, value: i32 },

    #[error("Duration must be a positive number of hours, got {value}")]
    InvalidDuration { field: &'static str, value: String },

    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
}

impl InputError {
    /// The request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidTimestamp { field, .. }
            | Self::InvalidDate { field, .. }
            | Self::InvalidTime { field, .. }
            | Self::InvalidWeekday { field, .. }
            | Self::InvalidDuration { field, .. }
            | Self::ZeroCount { field } => field,
        }
    }
}

/// Parses an RFC 3339 timestamp, or a date meaning midnight UTC.
///
/// # Errors
///
/// Returns `InputError::InvalidTimestamp` if the value is neither form.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, InputError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| InputError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Parses an optional timestamp field.
///
/// # Errors
///
/// Returns `InputError::InvalidTimestamp` if a present value does not parse.
pub fn parse_optional_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, InputError> {
    value.map(|v| parse_timestamp(field, v)).transpose()
}

/// # Errors
///
/// Returns `InputError::InvalidDate` if the value is not `YYYY-MM-DD`.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| InputError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// # Errors
///
/// Returns `InputError::InvalidTime` if a present value is not `HH:MM`.
pub fn parse_optional_time(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveTime>, InputError> {
    value
        .map(|v| {
            NaiveTime::parse_from_str(v.trim(), "%H:%M").map_err(|_| InputError::InvalidTime {
                field,
                value: v.to_string(),
            })
        })
        .transpose()
}

/// # Errors
///
/// Returns `InputError::InvalidWeekday` outside 0..=6.
pub fn parse_weekday(field: &'static str, value: i32) -> Result<Weekday, InputError> {
    weekday_from_index(value).map_err(|_| InputError::InvalidWeekday { field, value })
}

/// Resolves an optional duration, falling back to `default`.
///
/// # Errors
///
/// Returns `InputError::InvalidDuration` for zero, negative, or non-finite
/// values.
pub fn parse_duration(
    field: &'static str,
    value: Option<f64>,
    default: f64,
) -> Result<f64, InputError> {
    let hours = value.unwrap_or(default);
    if !hours.is_finite() || hours <= 0.0 {
        return Err(InputError::InvalidDuration {
            field,
            value: hours.to_string(),
        });
    }
    Ok(hours)
}

/// Resolves an optional count, falling back to `default`.
///
/// # Errors
///
/// Returns `InputError::ZeroCount` if the count is zero.
pub fn parse_count(
    field: &'static str,
    value: Option<usize>,
    default: usize,
) -> Result<usize, InputError> {
    match value.unwrap_or(default) {
        0 => Err(InputError::ZeroCount { field }),
        count => Ok(count),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_accepts_offsets_and_bare_dates() {
        assert_eq!(
            parse_timestamp("from", "2025-01-06T10:00:00+01:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("from", "2025-03-01").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_bad_timestamp_names_field() {
        let err = parse_timestamp("to", "next tuesday").unwrap_err();
        assert_eq!(err.field(), "to");
        assert!(err.to_string().contains("next tuesday"));
    }

    #[test]
    fn test_weekday_is_sunday_based() {
        assert_eq!(parse_weekday("weekday", 0).unwrap(), Weekday::Sun);
        assert_eq!(parse_weekday("weekday", 6).unwrap(), Weekday::Sat);
        assert_eq!(
            parse_weekday("weekday", 7),
            Err(InputError::InvalidWeekday {
                field: "weekday",
                value: 7
            })
        );
    }

    #[test]
    fn test_duration_must_be_positive() {
        assert!((parse_duration("duration_hours", None, 4.0).unwrap() - 4.0).abs() < f64::EPSILON);
        assert!(parse_duration("duration_hours", Some(0.0), 4.0).is_err());
        assert!(parse_duration("duration_hours", Some(f64::NAN), 4.0).is_err());
    }

    #[test]
    fn test_time_requires_hours_and_minutes() {
        assert_eq!(
            parse_optional_time("start_time", Some("08:30")).unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0)
        );
        assert_eq!(parse_optional_time("start_time", None).unwrap(), None);
        assert!(parse_optional_time("start_time", Some("8am")).is_err());
    }

    #[test]
    fn test_zero_count_is_rejected() {
        assert_eq!(parse_count("max_count", None, 100), Ok(100));
        assert_eq!(
            parse_count("max_count", Some(0), 100),
            Err(InputError::ZeroCount { field: "max_count" })
        );
    }
}
