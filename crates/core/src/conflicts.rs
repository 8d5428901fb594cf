// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store-backed conflict detection. Read-only.

use crate::error::CoreError;
use crate::store::{JobStore, PilotStore};
use chrono::NaiveDate;
use flightline_domain::{
    ConflictReport, DateWindow, Pilot, PilotAvailability, PilotBlackout, ScheduleContext,
    evaluate_conflicts,
};
use serde::Serialize;
use tracing::debug;

/// Answer to "can this pilot take work on this date?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentCheck {
    pub can_assign: bool,
    /// Message of the first blocking conflict when `can_assign` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A pilot's report together with the workload counts behind it.
pub(crate) struct PilotEvaluation {
    pub report: ConflictReport,
    pub week_jobs: u32,
    pub month_jobs: u32,
}

/// Evaluates every conflict rule for a pilot on a date.
///
/// # Errors
///
/// Returns an error if the pilot does not exist or the store fails. Having
/// conflicts is not an error.
pub fn detect_conflicts<S>(
    store: &mut S,
    pilot_id: i64,
    date: NaiveDate,
    duration_hours: f64,
) -> Result<ConflictReport, CoreError>
where
    S: PilotStore + JobStore + ?Sized,
{
    let pilot: Pilot = store
        .get_pilot(pilot_id)?
        .ok_or(CoreError::PilotNotFound(pilot_id))?;
    Ok(evaluate_pilot(store, &pilot, date, duration_hours)?.report)
}

/// Whether the pilot can be scheduled on the date, with the blocking reason.
///
/// # Errors
///
/// Returns an error if the pilot does not exist or the store fails.
pub fn can_assign_pilot<S>(
    store: &mut S,
    pilot_id: i64,
    date: NaiveDate,
    duration_hours: f64,
) -> Result<AssignmentCheck, CoreError>
where
    S: PilotStore + JobStore + ?Sized,
{
    let report: ConflictReport = detect_conflicts(store, pilot_id, date, duration_hours)?;
    Ok(AssignmentCheck {
        can_assign: report.can_schedule,
        reason: report.first_error().map(|c| c.message.clone()),
    })
}

pub(crate) fn evaluate_pilot<S>(
    store: &mut S,
    pilot: &Pilot,
    date: NaiveDate,
    duration_hours: f64,
) -> Result<PilotEvaluation, CoreError>
where
    S: PilotStore + JobStore + ?Sized,
{
    let availability: Vec<PilotAvailability> = store.availability_for(pilot.pilot_id)?;
    let blackouts: Vec<PilotBlackout> =
        store.blackouts_overlapping(pilot.pilot_id, DateWindow::new(date, date)?)?;
    let booked_jobs = store.jobs_for_pilot_on(pilot.pilot_id, date)?;
    let week_jobs: u32 = store.count_pilot_jobs(pilot.pilot_id, DateWindow::week_of(date)?)?;
    let month_jobs: u32 = store.count_pilot_jobs(pilot.pilot_id, DateWindow::month_of(date)?)?;

    let report: ConflictReport = evaluate_conflicts(&ScheduleContext {
        date,
        duration_hours,
        availability: &availability,
        blackouts: &blackouts,
        booked_jobs: &booked_jobs,
        limits: pilot.limits,
        week_job_count: week_jobs,
        month_job_count: month_jobs,
    })?;

    debug!(
        pilot_id = pilot.pilot_id,
        %date,
        conflicts = report.conflicts.len(),
        can_schedule = report.can_schedule,
        "Evaluated schedule conflicts"
    );

    Ok(PilotEvaluation {
        report,
        week_jobs,
        month_jobs,
    })
}
