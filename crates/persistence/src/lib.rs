// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for the Flightline engines.
//!
//! `Persistence` implements every store trait from the `flightline` crate on
//! top of Diesel. The idempotency model depends on three constraints that the
//! migrations create and the engines rely on:
//!
//! - `recurring_job_occurrences (template_id, occurs_at)` is unique
//! - `job_metadata.source_occurrence_id` is unique
//! - an occurrence has a `job_id` iff its status is `created`
//!
//! A uniqueness violation on an occurrence or job insert is reported to the
//! engines as `InsertOutcome::AlreadyExists`, never as an error.
//!
//! ## Testing
//!
//! Every call to `Persistence::new_in_memory()` receives its own shared
//! in-memory database, so tests are isolated without touching the filesystem.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use chrono::{DateTime, NaiveDate, Utc};
use diesel::SqliteConnection;
use flightline::{
    InsertOutcome, JobStore, LinkOutcome, OccurrenceStore, PilotStore, StoreError, TemplateStore,
};
use flightline_domain::{
    DateWindow, Job, JobSummary, NewJob, NewPilot, OccurrenceStatus, Pilot, PilotAvailability,
    PilotBlackout, RecurringJobOccurrence, RecurringJobTemplate, TemplateDraft,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::StoredField;
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter backed by a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

/// Maps a uniqueness violation to "already exists".
fn insert_outcome(result: Result<i64, PersistenceError>) -> Result<InsertOutcome, StoreError> {
    match result {
        Ok(id) => Ok(InsertOutcome::Inserted(id)),
        Err(PersistenceError::UniqueViolation(_)) => Ok(InsertOutcome::AlreadyExists),
        Err(e) => Err(e.into()),
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:flightline_mem_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }
}

// ============================================================================
// Templates
// ============================================================================

impl TemplateStore for Persistence {
    fn insert_template(
        &mut self,
        draft: &TemplateDraft,
    ) -> Result<RecurringJobTemplate, StoreError> {
        let template_id = mutations::templates::insert_template(&mut self.conn, draft)?;
        queries::templates::get_template(&mut self.conn, template_id)?.ok_or_else(|| {
            StoreError::Other(format!("template {template_id} vanished after insert"))
        })
    }

    fn get_template(
        &mut self,
        template_id: i64,
    ) -> Result<Option<RecurringJobTemplate>, StoreError> {
        Ok(queries::templates::get_template(&mut self.conn, template_id)?)
    }

    fn update_template(
        &mut self,
        template_id: i64,
        draft: &TemplateDraft,
    ) -> Result<bool, StoreError> {
        Ok(mutations::templates::update_template(
            &mut self.conn,
            template_id,
            draft,
        )?)
    }

    fn set_template_active(&mut self, template_id: i64, active: bool) -> Result<bool, StoreError> {
        Ok(mutations::templates::set_template_active(
            &mut self.conn,
            template_id,
            active,
        )?)
    }

    fn delete_template(&mut self, template_id: i64) -> Result<bool, StoreError> {
        Ok(mutations::templates::delete_template(
            &mut self.conn,
            template_id,
        )?)
    }

    fn list_sweepable_templates(&mut self) -> Result<Vec<RecurringJobTemplate>, StoreError> {
        Ok(queries::templates::list_sweepable_templates(&mut self.conn)?)
    }

    fn advance_watermark(
        &mut self,
        template_id: i64,
        through: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        Ok(mutations::templates::advance_watermark(
            &mut self.conn,
            template_id,
            through,
        )?)
    }
}

// ============================================================================
// Occurrences
// ============================================================================

impl OccurrenceStore for Persistence {
    fn insert_occurrence(
        &mut self,
        template_id: i64,
        occurs_at: DateTime<Utc>,
    ) -> Result<InsertOutcome, StoreError> {
        insert_outcome(mutations::occurrences::insert_occurrence(
            &mut self.conn,
            template_id,
            occurs_at,
        ))
    }

    fn get_occurrence(
        &mut self,
        occurrence_id: i64,
    ) -> Result<Option<RecurringJobOccurrence>, StoreError> {
        Ok(queries::occurrences::get_occurrence(
            &mut self.conn,
            occurrence_id,
        )?)
    }

    fn list_occurrences(
        &mut self,
        template_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<RecurringJobOccurrence>, StoreError> {
        Ok(queries::occurrences::list_occurrences(
            &mut self.conn,
            template_id,
            from,
            to,
        )?)
    }

    fn list_due_occurrences(
        &mut self,
        template_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<RecurringJobOccurrence>, StoreError> {
        Ok(queries::occurrences::list_due_occurrences(
            &mut self.conn,
            template_id,
            now,
        )?)
    }

    fn count_created_occurrences(&mut self, template_id: i64) -> Result<u64, StoreError> {
        Ok(queries::occurrences::count_created_occurrences(
            &mut self.conn,
            template_id,
        )?)
    }

    fn mark_occurrence_created(
        &mut self,
        occurrence_id: i64,
        job_id: i64,
    ) -> Result<LinkOutcome, StoreError> {
        Ok(mutations::occurrences::mark_occurrence_created(
            &mut self.conn,
            occurrence_id,
            job_id,
        )?)
    }

    fn set_occurrence_status(
        &mut self,
        occurrence_id: i64,
        status: OccurrenceStatus,
    ) -> Result<bool, StoreError> {
        Ok(mutations::occurrences::set_occurrence_status(
            &mut self.conn,
            occurrence_id,
            status,
        )?)
    }
}

// ============================================================================
// Jobs
// ============================================================================

impl JobStore for Persistence {
    fn insert_job(&mut self, job: &NewJob) -> Result<InsertOutcome, StoreError> {
        insert_outcome(mutations::jobs::insert_job(&mut self.conn, job))
    }

    fn get_job(&mut self, job_id: i64) -> Result<Option<Job>, StoreError> {
        Ok(queries::jobs::get_job(&mut self.conn, job_id)?)
    }

    fn find_job_by_source_occurrence(
        &mut self,
        occurrence_id: i64,
    ) -> Result<Option<i64>, StoreError> {
        Ok(queries::jobs::find_job_by_source_occurrence(
            &mut self.conn,
            occurrence_id,
        )?)
    }

    fn jobs_for_pilot_on(
        &mut self,
        pilot_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<JobSummary>, StoreError> {
        Ok(queries::jobs::jobs_for_pilot_on(
            &mut self.conn,
            pilot_id,
            date,
        )?)
    }

    fn count_pilot_jobs(&mut self, pilot_id: i64, window: DateWindow) -> Result<u32, StoreError> {
        Ok(queries::jobs::count_pilot_jobs(
            &mut self.conn,
            pilot_id,
            window,
        )?)
    }

    fn schedule_job(&mut self, job_id: i64, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(mutations::jobs::schedule_job(&mut self.conn, job_id, date)?)
    }

    fn assign_pilot(&mut self, job_id: i64, pilot_id: i64) -> Result<(), StoreError> {
        Ok(mutations::jobs::assign_pilot(
            &mut self.conn,
            job_id,
            pilot_id,
        )?)
    }
}

// ============================================================================
// Pilots
// ============================================================================

impl PilotStore for Persistence {
    fn insert_pilot(&mut self, pilot: &NewPilot) -> Result<Pilot, StoreError> {
        let pilot_id = mutations::pilots::insert_pilot(&mut self.conn, pilot)?;
        queries::pilots::get_pilot(&mut self.conn, pilot_id)?
            .ok_or_else(|| StoreError::Other(format!("user {pilot_id} vanished after insert")))
    }

    fn get_pilot(&mut self, pilot_id: i64) -> Result<Option<Pilot>, StoreError> {
        Ok(queries::pilots::get_pilot(&mut self.conn, pilot_id)?)
    }

    fn list_candidates(&mut self) -> Result<Vec<Pilot>, StoreError> {
        Ok(queries::pilots::list_candidates(&mut self.conn)?)
    }

    fn availability_for(&mut self, pilot_id: i64) -> Result<Vec<PilotAvailability>, StoreError> {
        Ok(queries::pilots::availability_for(&mut self.conn, pilot_id)?)
    }

    fn replace_availability(
        &mut self,
        pilot_id: i64,
        rows: &[PilotAvailability],
    ) -> Result<(), StoreError> {
        Ok(mutations::pilots::replace_availability(
            &mut self.conn,
            pilot_id,
            rows,
        )?)
    }

    fn blackouts_overlapping(
        &mut self,
        pilot_id: i64,
        window: DateWindow,
    ) -> Result<Vec<PilotBlackout>, StoreError> {
        Ok(queries::pilots::blackouts_overlapping(
            &mut self.conn,
            pilot_id,
            window,
        )?)
    }

    fn insert_blackout(
        &mut self,
        pilot_id: i64,
        window: DateWindow,
        reason: Option<&str>,
    ) -> Result<PilotBlackout, StoreError> {
        let blackout_id =
            mutations::pilots::insert_blackout(&mut self.conn, pilot_id, window, reason)?;
        Ok(PilotBlackout {
            blackout_id,
            pilot_id,
            start_date: window.start,
            end_date: window.end,
            reason: reason.map(str::to_string),
        })
    }
}
