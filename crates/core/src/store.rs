// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read/write contracts the engines need from durable storage.
//!
//! Every engine receives its store as a call parameter. Implementations must
//! enforce the uniqueness constraints the idempotency model relies on:
//!
//! - one occurrence per (template, timestamp)
//! - one job per source occurrence
//!
//! and report a violation of either as [`InsertOutcome::AlreadyExists`]
//! rather than as an error.

use crate::error::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use flightline_domain::{
    DateWindow, Job, JobSummary, NewJob, NewPilot, OccurrenceStatus, Pilot, PilotAvailability,
    PilotBlackout, RecurringJobOccurrence, RecurringJobTemplate, TemplateDraft,
};

/// Result of an insert guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written with this id.
    Inserted(i64),
    /// An equivalent row already exists.
    AlreadyExists,
}

/// Result of linking an occurrence to its job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The occurrence is now `created` with the given job.
    Linked,
    /// The occurrence was already `created`, linked to this job.
    AlreadyLinked(i64),
}

pub trait TemplateStore {
    /// Stores a new template, active and never generated.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn insert_template(&mut self, draft: &TemplateDraft)
    -> Result<RecurringJobTemplate, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_template(&mut self, template_id: i64)
    -> Result<Option<RecurringJobTemplate>, StoreError>;

    /// Replaces a template's definition, keeping its active flag and watermark.
    ///
    /// Returns `false` if the template does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn update_template(&mut self, template_id: i64, draft: &TemplateDraft)
    -> Result<bool, StoreError>;

    /// Returns `false` if the template does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn set_template_active(&mut self, template_id: i64, active: bool) -> Result<bool, StoreError>;

    /// Deletes a template together with all of its occurrences.
    ///
    /// Returns `false` if the template does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn delete_template(&mut self, template_id: i64) -> Result<bool, StoreError>;

    /// Active, non-manual templates, in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_sweepable_templates(&mut self) -> Result<Vec<RecurringJobTemplate>, StoreError>;

    /// Moves the watermark to `through` only if that is later than its
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn advance_watermark(&mut self, template_id: i64, through: DateTime<Utc>)
    -> Result<(), StoreError>;
}

pub trait OccurrenceStore {
    /// Inserts a `planned` occurrence.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails. A duplicate timestamp for the
    /// template is not an error.
    fn insert_occurrence(
        &mut self,
        template_id: i64,
        occurs_at: DateTime<Utc>,
    ) -> Result<InsertOutcome, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_occurrence(&mut self, occurrence_id: i64)
    -> Result<Option<RecurringJobOccurrence>, StoreError>;

    /// Occurrences of a template within inclusive bounds, ordered by time.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_occurrences(
        &mut self,
        template_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<RecurringJobOccurrence>, StoreError>;

    /// `planned` occurrences of a template at or before `now`, ordered by time.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_due_occurrences(
        &mut self,
        template_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<RecurringJobOccurrence>, StoreError>;

    /// Number of a template's occurrences in `created` status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn count_created_occurrences(&mut self, template_id: i64) -> Result<u64, StoreError>;

    /// Sets `created` and the job link, unless the occurrence is already
    /// `created`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the occurrence does not exist.
    fn mark_occurrence_created(
        &mut self,
        occurrence_id: i64,
        job_id: i64,
    ) -> Result<LinkOutcome, StoreError>;

    /// Sets a non-`created` status. Returns `false` if the occurrence does not
    /// exist or is already `created`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn set_occurrence_status(
        &mut self,
        occurrence_id: i64,
        status: OccurrenceStatus,
    ) -> Result<bool, StoreError>;
}

pub trait JobStore {
    /// Inserts a job with its metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails. A job for an already-used source
    /// occurrence is reported as `AlreadyExists`.
    fn insert_job(&mut self, job: &NewJob) -> Result<InsertOutcome, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails or the stored job is malformed.
    fn get_job(&mut self, job_id: i64) -> Result<Option<Job>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_job_by_source_occurrence(&mut self, occurrence_id: i64)
    -> Result<Option<i64>, StoreError>;

    /// Jobs scheduled on `date` that include the pilot, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn jobs_for_pilot_on(&mut self, pilot_id: i64, date: NaiveDate)
    -> Result<Vec<JobSummary>, StoreError>;

    /// Number of jobs including the pilot scheduled within `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn count_pilot_jobs(&mut self, pilot_id: i64, window: DateWindow) -> Result<u32, StoreError>;

    /// Sets the scheduled date, appending it to the job's date history.
    ///
    /// Returns `false` if the job does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn schedule_job(&mut self, job_id: i64, date: NaiveDate) -> Result<bool, StoreError>;

    /// Adds a pilot to a job's assigned set. Assigning twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn assign_pilot(&mut self, job_id: i64, pilot_id: i64) -> Result<(), StoreError>;
}

pub trait PilotStore {
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn insert_pilot(&mut self, pilot: &NewPilot) -> Result<Pilot, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_pilot(&mut self, pilot_id: i64) -> Result<Option<Pilot>, StoreError>;

    /// Users holding the pilot or staff role, in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_candidates(&mut self) -> Result<Vec<Pilot>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn availability_for(&mut self, pilot_id: i64) -> Result<Vec<PilotAvailability>, StoreError>;

    /// Replaces the pilot's whole weekly pattern. An empty slice clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn replace_availability(
        &mut self,
        pilot_id: i64,
        rows: &[PilotAvailability],
    ) -> Result<(), StoreError>;

    /// Blackouts overlapping `window`, ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn blackouts_overlapping(
        &mut self,
        pilot_id: i64,
        window: DateWindow,
    ) -> Result<Vec<PilotBlackout>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn insert_blackout(
        &mut self,
        pilot_id: i64,
        window: DateWindow,
        reason: Option<&str>,
    ) -> Result<PilotBlackout, StoreError>;
}

/// Everything the sweep and the HTTP surface need from one store handle.
pub trait Store: TemplateStore + OccurrenceStore + JobStore + PilotStore {}

impl<T: TemplateStore + OccurrenceStore + JobStore + PilotStore> Store for T {}
