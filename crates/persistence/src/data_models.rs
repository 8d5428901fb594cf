// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Column encodings shared by queries and mutations.
//!
//! Timestamps are stored as RFC 3339 UTC text with a fixed nine-digit
//! fraction, so the stored value is the exact instant and string comparison
//! in SQL orders them correctly. Dates are `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::str::FromStr;

use crate::error::PersistenceError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Outcome of decoding a nullable JSON snapshot column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredField<T> {
    /// The column is `NULL`.
    Absent,
    /// The column holds text that does not decode.
    Malformed { raw: String, error: String },
    Present(T),
}

impl<T: DeserializeOwned> StoredField<T> {
    #[must_use]
    pub fn decode(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Absent,
            Some(text) => match serde_json::from_str(text) {
                Ok(value) => Self::Present(value),
                Err(e) => Self::Malformed {
                    raw: text.to_string(),
                    error: e.to_string(),
                },
            },
        }
    }
}

impl<T: Default> StoredField<T> {
    /// Resolves the field, treating `NULL` as the empty value.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::MalformedField` if the column did not decode.
    pub fn or_default_for(
        self,
        table: &'static str,
        column: &'static str,
    ) -> Result<T, PersistenceError> {
        match self {
            Self::Absent => Ok(T::default()),
            Self::Present(value) => Ok(value),
            Self::Malformed { raw, error } => Err(PersistenceError::malformed(
                table,
                column,
                format!("{error} (stored: {raw})"),
            )),
        }
    }
}

pub(crate) fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(value)?)
}

#[must_use]
pub(crate) fn encode_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn decode_timestamp(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| PersistenceError::malformed(table, column, format!("'{raw}': {e}")))
}

pub(crate) fn decode_optional_timestamp(
    raw: Option<&str>,
    table: &'static str,
    column: &'static str,
) -> Result<Option<DateTime<Utc>>, PersistenceError> {
    raw.map(|r| decode_timestamp(r, table, column)).transpose()
}

#[must_use]
pub(crate) fn encode_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub(crate) fn decode_date(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<NaiveDate, PersistenceError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| PersistenceError::malformed(table, column, format!("'{raw}': {e}")))
}

#[must_use]
pub(crate) fn encode_time(value: NaiveTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

pub(crate) fn decode_optional_time(
    raw: Option<&str>,
    table: &'static str,
    column: &'static str,
) -> Result<Option<NaiveTime>, PersistenceError> {
    raw.map(|r| {
        NaiveTime::parse_from_str(r, TIME_FORMAT)
            .map_err(|e| PersistenceError::malformed(table, column, format!("'{r}': {e}")))
    })
    .transpose()
}

/// Parses a text enum column through the domain type's `FromStr`.
pub(crate) fn decode_enum<T>(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<T, PersistenceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| PersistenceError::malformed(table, column, e))
}

#[must_use]
pub(crate) const fn encode_flag(value: bool) -> i32 {
    if value { 1 } else { 0 }
}

#[must_use]
pub(crate) const fn decode_flag(value: i32) -> bool {
    value != 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_sort_as_text() {
        let early = encode_timestamp(Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap());
        let late = encode_timestamp(Utc.with_ymd_and_hms(2025, 11, 3, 9, 0, 0).unwrap());
        assert_eq!(early, "2025-01-06T09:00:00.000000000Z");
        assert!(early < late);
    }

    #[test]
    fn test_sub_second_instants_survive_and_keep_order() {
        let base = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
        let a = base + chrono::TimeDelta::nanoseconds(999);
        let b = base + chrono::TimeDelta::nanoseconds(1_000);
        let c = base + chrono::TimeDelta::milliseconds(250);

        let encoded = [encode_timestamp(a), encode_timestamp(b), encode_timestamp(c)];
        assert!(encoded[0] < encoded[1] && encoded[1] < encoded[2]);
        assert_eq!(encoded[0].len(), encoded[2].len());
        assert_eq!(decode_timestamp(&encoded[0], "t", "c").unwrap(), a);
    }

    #[test]
    fn test_stored_field_distinguishes_absent_from_malformed() {
        let absent: StoredField<Vec<String>> = StoredField::decode(None);
        assert_eq!(absent.or_default_for("jobs", "products_json").unwrap(), Vec::<String>::new());

        let malformed: StoredField<Vec<String>> = StoredField::decode(Some("[1,"));
        assert!(matches!(
            malformed.or_default_for("jobs", "products_json"),
            Err(PersistenceError::MalformedField {
                table: "jobs",
                column: "products_json",
                ..
            })
        ));

        let present: StoredField<Vec<String>> = StoredField::decode(Some(r#"["a"]"#));
        assert_eq!(present, StoredField::Present(vec![String::from("a")]));
    }

    #[test]
    fn test_bad_timestamp_names_its_column() {
        let err = decode_timestamp("next tuesday", "recurring_job_occurrences", "occurs_at")
            .unwrap_err();
        assert!(err.to_string().contains("recurring_job_occurrences.occurs_at"));
    }
}
