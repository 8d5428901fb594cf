// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use diesel::SqliteConnection;
use diesel::prelude::*;
use flightline_domain::NewJob;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{StoredField, encode_date, encode_json};
use crate::diesel_schema::{job_assignments, job_metadata, jobs};
use crate::error::PersistenceError;

/// Inserts a job and its metadata row in one transaction.
///
/// # Returns
///
/// The new job ID.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if another job already claims
/// the same source occurrence (nothing is written in that case), or another
/// error if a statement fails.
pub fn insert_job(conn: &mut SqliteConnection, job: &NewJob) -> Result<i64, PersistenceError> {
    let products_json: String = encode_json(&job.products)?;
    let date_history_json: String = encode_json(&job.date_history)?;

    conn.transaction(|conn| {
        diesel::insert_into(jobs::table)
            .values((
                jobs::name.eq(&job.name),
                jobs::site_id.eq(job.site_id),
                jobs::client_type.eq(job.client.client_type.as_str()),
                jobs::client_id.eq(job.client.client_id),
                jobs::products_json.eq(&products_json),
                jobs::date_history_json.eq(&date_history_json),
                jobs::stage.eq(job.stage.as_str()),
                jobs::scheduled_date.eq(job.scheduled_date.map(encode_date)),
            ))
            .execute(conn)?;
        let job_id: i64 = conn.get_last_insert_rowid()?;

        diesel::insert_into(job_metadata::table)
            .values((
                job_metadata::job_id.eq(job_id),
                job_metadata::payable_amount_cents.eq(job.metadata.payable_amount_cents),
                job_metadata::notes.eq(job.metadata.notes.as_deref()),
                job_metadata::source_template_id.eq(job.metadata.source_template_id),
                job_metadata::source_occurrence_id.eq(job.metadata.source_occurrence_id),
            ))
            .execute(conn)?;

        info!(
            job_id,
            source_occurrence_id = job.metadata.source_occurrence_id,
            "Inserted job"
        );
        Ok(job_id)
    })
}

/// Sets a job's scheduled date and appends it to the date history.
///
/// # Returns
///
/// `false` if the job does not exist.
///
/// # Errors
///
/// Returns an error if a statement fails or the stored history is malformed.
pub fn schedule_job(
    conn: &mut SqliteConnection,
    job_id: i64,
    date: NaiveDate,
) -> Result<bool, PersistenceError> {
    conn.transaction(|conn| {
        let Some(raw_history) = jobs::table
            .filter(jobs::job_id.eq(job_id))
            .select(jobs::date_history_json)
            .first::<Option<String>>(conn)
            .optional()?
        else {
            return Ok(false);
        };

        let mut history: Vec<NaiveDate> = StoredField::decode(raw_history.as_deref())
            .or_default_for("jobs", "date_history_json")?;
        history.push(date);

        diesel::update(jobs::table)
            .filter(jobs::job_id.eq(job_id))
            .set((
                jobs::scheduled_date.eq(Some(encode_date(date))),
                jobs::date_history_json.eq(Some(encode_json(&history)?)),
            ))
            .execute(conn)?;

        debug!(job_id, %date, "Updated job schedule");
        Ok(true)
    })
}

/// Adds a pilot to a job. Adding a pilot twice is a no-op.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the job or pilot
/// does not exist.
pub fn assign_pilot(
    conn: &mut SqliteConnection,
    job_id: i64,
    pilot_id: i64,
) -> Result<(), PersistenceError> {
    diesel::insert_or_ignore_into(job_assignments::table)
        .values((
            job_assignments::job_id.eq(job_id),
            job_assignments::pilot_id.eq(pilot_id),
        ))
        .execute(conn)?;
    Ok(())
}
