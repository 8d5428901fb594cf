// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use diesel::prelude::*;
use flightline::LinkOutcome;
use flightline_domain::OccurrenceStatus;

use crate::backend::PersistenceBackend;
use crate::data_models::encode_timestamp;
use crate::diesel_schema::recurring_job_occurrences;
use crate::error::PersistenceError;

/// Inserts a `planned` occurrence.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the template already has an
/// occurrence at this instant, or another error if the insert fails.
pub fn insert_occurrence(
    conn: &mut SqliteConnection,
    template_id: i64,
    occurs_at: DateTime<Utc>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(recurring_job_occurrences::table)
        .values((
            recurring_job_occurrences::template_id.eq(template_id),
            recurring_job_occurrences::occurs_at.eq(encode_timestamp(occurs_at)),
            recurring_job_occurrences::status.eq(OccurrenceStatus::Planned.as_str()),
        ))
        .execute(conn)?;

    conn.get_last_insert_rowid()
}

/// Links an occurrence to its job and marks it `created`.
///
/// The update only applies while the occurrence is not yet `created`, so of
/// two racing promoters exactly one links.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the occurrence does not exist, or
/// another error if a statement fails.
pub fn mark_occurrence_created(
    conn: &mut SqliteConnection,
    occurrence_id: i64,
    job_id: i64,
) -> Result<LinkOutcome, PersistenceError> {
    let created = OccurrenceStatus::Created.as_str();

    let updated: usize = diesel::update(recurring_job_occurrences::table)
        .filter(recurring_job_occurrences::occurrence_id.eq(occurrence_id))
        .filter(recurring_job_occurrences::status.ne(created))
        .set((
            recurring_job_occurrences::status.eq(created),
            recurring_job_occurrences::job_id.eq(Some(job_id)),
        ))
        .execute(conn)?;

    if updated > 0 {
        return Ok(LinkOutcome::Linked);
    }

    let existing: Option<Option<i64>> = recurring_job_occurrences::table
        .filter(recurring_job_occurrences::occurrence_id.eq(occurrence_id))
        .select(recurring_job_occurrences::job_id)
        .first(conn)
        .optional()?;

    match existing {
        Some(Some(linked)) => Ok(LinkOutcome::AlreadyLinked(linked)),
        Some(None) => Err(PersistenceError::Other(format!(
            "occurrence {occurrence_id} was not linked and has no job"
        ))),
        None => Err(PersistenceError::NotFound(format!(
            "occurrence {occurrence_id}"
        ))),
    }
}

/// Sets the status of an occurrence that is not `created`.
///
/// # Returns
///
/// `false` if the occurrence does not exist or is already `created`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_occurrence_status(
    conn: &mut SqliteConnection,
    occurrence_id: i64,
    status: OccurrenceStatus,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(recurring_job_occurrences::table)
        .filter(recurring_job_occurrences::occurrence_id.eq(occurrence_id))
        .filter(recurring_job_occurrences::status.ne(OccurrenceStatus::Created.as_str()))
        .set(recurring_job_occurrences::status.eq(status.as_str()))
        .execute(conn)?;

    Ok(updated > 0)
}
