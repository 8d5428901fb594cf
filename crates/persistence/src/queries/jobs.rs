// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use diesel::SqliteConnection;
use diesel::prelude::*;
use flightline_domain::{
    ClientRef, DateWindow, Job, JobMetadata, JobSummary, NewJob, ProductLine,
};

use crate::data_models::{StoredField, decode_date, decode_enum, encode_date};
use crate::diesel_schema::{job_assignments, job_metadata, jobs};
use crate::error::PersistenceError;

const TABLE: &str = "jobs";

#[derive(Queryable, Selectable)]
#[diesel(table_name = jobs)]
struct JobRow {
    job_id: i64,
    name: String,
    site_id: i64,
    client_type: String,
    client_id: i64,
    products_json: Option<String>,
    date_history_json: Option<String>,
    stage: String,
    scheduled_date: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = job_metadata)]
struct MetadataRow {
    payable_amount_cents: Option<i64>,
    notes: Option<String>,
    source_template_id: Option<i64>,
    source_occurrence_id: Option<i64>,
}

impl From<MetadataRow> for JobMetadata {
    fn from(row: MetadataRow) -> Self {
        Self {
            payable_amount_cents: row.payable_amount_cents,
            notes: row.notes,
            source_template_id: row.source_template_id,
            source_occurrence_id: row.source_occurrence_id,
        }
    }
}

fn decode_job(
    row: JobRow,
    metadata: JobMetadata,
    assigned_pilots: Vec<i64>,
) -> Result<Job, PersistenceError> {
    let products: Vec<ProductLine> =
        StoredField::decode(row.products_json.as_deref()).or_default_for(TABLE, "products_json")?;
    let date_history: Vec<NaiveDate> = StoredField::decode(row.date_history_json.as_deref())
        .or_default_for(TABLE, "date_history_json")?;

    Ok(Job {
        job_id: row.job_id,
        details: NewJob {
            name: row.name,
            site_id: row.site_id,
            client: ClientRef {
                client_type: decode_enum(&row.client_type, TABLE, "client_type")?,
                client_id: row.client_id,
            },
            products,
            date_history,
            stage: decode_enum(&row.stage, TABLE, "stage")?,
            scheduled_date: row
                .scheduled_date
                .as_deref()
                .map(|d| decode_date(d, TABLE, "scheduled_date"))
                .transpose()?,
            metadata,
        },
        assigned_pilots,
    })
}

/// Retrieves a job with its metadata and assigned pilots.
///
/// A job without a metadata row loads with empty metadata.
///
/// # Errors
///
/// Returns an error if a query fails or a snapshot column is malformed.
/// Returns `Ok(None)` if the job does not exist.
pub fn get_job(conn: &mut SqliteConnection, job_id: i64) -> Result<Option<Job>, PersistenceError> {
    let Some(row) = jobs::table
        .filter(jobs::job_id.eq(job_id))
        .select(JobRow::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let metadata: JobMetadata = job_metadata::table
        .filter(job_metadata::job_id.eq(job_id))
        .select(MetadataRow::as_select())
        .first(conn)
        .optional()?
        .map(JobMetadata::from)
        .unwrap_or_default();

    let assigned_pilots: Vec<i64> = job_assignments::table
        .filter(job_assignments::job_id.eq(job_id))
        .order(job_assignments::pilot_id.asc())
        .select(job_assignments::pilot_id)
        .load(conn)?;

    decode_job(row, metadata, assigned_pilots).map(Some)
}

/// Finds the job promoted from an occurrence.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_job_by_source_occurrence(
    conn: &mut SqliteConnection,
    occurrence_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(job_metadata::table
        .filter(job_metadata::source_occurrence_id.eq(occurrence_id))
        .select(job_metadata::job_id)
        .first(conn)
        .optional()?)
}

/// Jobs scheduled on `date` that include the pilot.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn jobs_for_pilot_on(
    conn: &mut SqliteConnection,
    pilot_id: i64,
    date: NaiveDate,
) -> Result<Vec<JobSummary>, PersistenceError> {
    let rows: Vec<(i64, String)> = jobs::table
        .inner_join(job_assignments::table)
        .filter(job_assignments::pilot_id.eq(pilot_id))
        .filter(jobs::scheduled_date.eq(encode_date(date)))
        .order(jobs::job_id.asc())
        .select((jobs::job_id, jobs::name))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(job_id, name)| JobSummary { job_id, name })
        .collect())
}

/// Counts the pilot's jobs scheduled inside an inclusive window.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_pilot_jobs(
    conn: &mut SqliteConnection,
    pilot_id: i64,
    window: DateWindow,
) -> Result<u32, PersistenceError> {
    let count: i64 = jobs::table
        .inner_join(job_assignments::table)
        .filter(job_assignments::pilot_id.eq(pilot_id))
        .filter(jobs::scheduled_date.ge(encode_date(window.start)))
        .filter(jobs::scheduled_date.le(encode_date(window.end)))
        .count()
        .get_result(conn)?;

    u32::try_from(count).map_err(|e| PersistenceError::QueryFailed(e.to_string()))
}
