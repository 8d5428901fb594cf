// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::conflicts::can_assign_pilot;
use crate::error::CoreError;
use crate::store::{JobStore, PilotStore};
use chrono::NaiveDate;
use flightline_domain::Job;
use tracing::info;

/// # Errors
///
/// Returns an error if the job does not exist or the store fails.
pub fn get_job<S>(store: &mut S, job_id: i64) -> Result<Job, CoreError>
where
    S: JobStore + ?Sized,
{
    store.get_job(job_id)?.ok_or(CoreError::JobNotFound(job_id))
}

/// Puts a job on the calendar.
///
/// # Errors
///
/// Returns an error if the job does not exist or the store fails.
pub fn schedule_job<S>(store: &mut S, job_id: i64, date: NaiveDate) -> Result<Job, CoreError>
where
    S: JobStore + ?Sized,
{
    if !store.schedule_job(job_id, date)? {
        return Err(CoreError::JobNotFound(job_id));
    }
    info!(job_id, %date, "Scheduled job");
    get_job(store, job_id)
}

/// Adds a pilot to a scheduled job, refusing hard conflicts.
///
/// Warnings do not block. Re-assigning a pilot already on the job is a no-op.
///
/// # Errors
///
/// Returns an error if:
/// - The job or pilot does not exist
/// - The job has no scheduled date
/// - A blocking conflict exists (`CoreError::SchedulingRejected`)
/// - The store fails
pub fn assign_pilot<S>(
    store: &mut S,
    job_id: i64,
    pilot_id: i64,
    duration_hours: f64,
) -> Result<Job, CoreError>
where
    S: JobStore + PilotStore + ?Sized,
{
    let job: Job = get_job(store, job_id)?;
    if job.is_assigned_to(pilot_id) {
        return Ok(job);
    }
    let date: NaiveDate = job
        .details
        .scheduled_date
        .ok_or(CoreError::JobNotScheduled(job_id))?;

    let check = can_assign_pilot(store, pilot_id, date, duration_hours)?;
    if !check.can_assign {
        return Err(CoreError::SchedulingRejected {
            pilot_id,
            reason: check
                .reason
                .unwrap_or_else(|| String::from("blocking conflict")),
        });
    }

    store.assign_pilot(job_id, pilot_id)?;
    info!(job_id, pilot_id, %date, "Assigned pilot to job");
    get_job(store, job_id)
}
