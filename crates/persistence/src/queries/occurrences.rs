// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use diesel::prelude::*;
use flightline_domain::{OccurrenceStatus, RecurringJobOccurrence};

use crate::data_models::{decode_enum, decode_timestamp, encode_timestamp};
use crate::diesel_schema::recurring_job_occurrences;
use crate::error::PersistenceError;

const TABLE: &str = "recurring_job_occurrences";

#[derive(Queryable, Selectable)]
#[diesel(table_name = recurring_job_occurrences)]
struct OccurrenceRow {
    occurrence_id: i64,
    template_id: i64,
    occurs_at: String,
    status: String,
    job_id: Option<i64>,
}

impl TryFrom<OccurrenceRow> for RecurringJobOccurrence {
    type Error = PersistenceError;

    fn try_from(row: OccurrenceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            occurrence_id: row.occurrence_id,
            template_id: row.template_id,
            occurs_at: decode_timestamp(&row.occurs_at, TABLE, "occurs_at")?,
            status: decode_enum(&row.status, TABLE, "status")?,
            job_id: row.job_id,
        })
    }
}

fn decode_rows(rows: Vec<OccurrenceRow>) -> Result<Vec<RecurringJobOccurrence>, PersistenceError> {
    rows.into_iter().map(RecurringJobOccurrence::try_from).collect()
}

/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
/// Returns `Ok(None)` if the occurrence does not exist.
pub fn get_occurrence(
    conn: &mut SqliteConnection,
    occurrence_id: i64,
) -> Result<Option<RecurringJobOccurrence>, PersistenceError> {
    recurring_job_occurrences::table
        .filter(recurring_job_occurrences::occurrence_id.eq(occurrence_id))
        .select(OccurrenceRow::as_select())
        .first(conn)
        .optional()?
        .map(RecurringJobOccurrence::try_from)
        .transpose()
}

/// Lists a template's occurrences within an inclusive range, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or any row is malformed.
pub fn list_occurrences(
    conn: &mut SqliteConnection,
    template_id: i64,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<RecurringJobOccurrence>, PersistenceError> {
    let mut query = recurring_job_occurrences::table
        .filter(recurring_job_occurrences::template_id.eq(template_id))
        .into_boxed();
    if let Some(from) = from {
        query = query.filter(recurring_job_occurrences::occurs_at.ge(encode_timestamp(from)));
    }
    if let Some(to) = to {
        query = query.filter(recurring_job_occurrences::occurs_at.le(encode_timestamp(to)));
    }

    let rows: Vec<OccurrenceRow> = query
        .order(recurring_job_occurrences::occurs_at.asc())
        .select(OccurrenceRow::as_select())
        .load(conn)?;

    decode_rows(rows)
}

/// Lists `planned` occurrences at or before `now`, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or any row is malformed.
pub fn list_due_occurrences(
    conn: &mut SqliteConnection,
    template_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<RecurringJobOccurrence>, PersistenceError> {
    let rows: Vec<OccurrenceRow> = recurring_job_occurrences::table
        .filter(recurring_job_occurrences::template_id.eq(template_id))
        .filter(recurring_job_occurrences::status.eq(OccurrenceStatus::Planned.as_str()))
        .filter(recurring_job_occurrences::occurs_at.le(encode_timestamp(now)))
        .order(recurring_job_occurrences::occurs_at.asc())
        .select(OccurrenceRow::as_select())
        .load(conn)?;

    decode_rows(rows)
}

/// Counts a template's occurrences that have been promoted to jobs.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_created_occurrences(
    conn: &mut SqliteConnection,
    template_id: i64,
) -> Result<u64, PersistenceError> {
    let count: i64 = recurring_job_occurrences::table
        .filter(recurring_job_occurrences::template_id.eq(template_id))
        .filter(recurring_job_occurrences::status.eq(OccurrenceStatus::Created.as_str()))
        .count()
        .get_result(conn)?;

    u64::try_from(count).map_err(|e| PersistenceError::QueryFailed(e.to_string()))
}
