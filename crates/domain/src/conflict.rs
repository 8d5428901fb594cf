// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduling conflict evaluation.
//!
//! Evaluation is a pure function over a snapshot of a pilot's calendar. Every
//! rule runs; a report may carry several conflicts at once.
//!
//! ## Invariants
//!
//! - A pilot with no availability rows and no blackouts has no conflicts
//! - Workload limits only ever produce warnings
//! - `can_schedule` is true iff no conflict has `Severity::Error`

use crate::calendar::DateWindow;
use crate::error::DomainError;
use crate::job::JobSummary;
use crate::pilot::{PilotAvailability, PilotBlackout};
use crate::types::WorkloadLimits;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How strongly a conflict affects scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks scheduling.
    Error,
    /// Advisory only.
    Warning,
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            _ => Err(DomainError::InvalidSeverity(s.to_string())),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// Which rule produced a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Availability,
    AvailabilityWindow,
    Blackout,
    DoubleBooking,
    WeeklyWorkload,
    MonthlyWorkload,
}

/// Structured data behind a conflict message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictDetails {
    Availability {
        weekday: Weekday,
    },
    AvailabilityWindow {
        available_hours: f64,
        required_hours: f64,
    },
    Blackout {
        blackout_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    },
    DoubleBooking {
        jobs: Vec<JobSummary>,
    },
    Workload {
        window: DateWindow,
        current: u32,
        maximum: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub conflict_type: ConflictType,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ConflictDetails>,
}

/// Outcome of evaluating one pilot against one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub conflicts: Vec<Conflict>,
    pub can_schedule: bool,
}

impl ConflictReport {
    #[must_use]
    pub fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        Self {
            has_conflicts: !conflicts.is_empty(),
            can_schedule: !conflicts.iter().any(|c| c.severity == Severity::Error),
            conflicts,
        }
    }

    /// The first blocking conflict, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&Conflict> {
        self.conflicts
            .iter()
            .find(|c| c.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.conflicts
            .iter()
            .filter(|c| c.severity == severity)
            .count()
    }
}

/// Calendar snapshot for one pilot and one date.
///
/// `booked_jobs` holds the jobs scheduled on `date` that already include the
/// pilot. The job counts cover the week and month windows of `date`.
#[derive(Debug, Clone)]
pub struct ScheduleContext<'a> {
    pub date: NaiveDate,
    pub duration_hours: f64,
    pub availability: &'a [PilotAvailability],
    pub blackouts: &'a [PilotBlackout],
    pub booked_jobs: &'a [JobSummary],
    pub limits: WorkloadLimits,
    pub week_job_count: u32,
    pub month_job_count: u32,
}

/// Runs every conflict rule against a calendar snapshot.
///
/// # Errors
///
/// Returns an error only if the week or month window of the date cannot be
/// computed.
pub fn evaluate_conflicts(ctx: &ScheduleContext<'_>) -> Result<ConflictReport, DomainError> {
    let mut conflicts: Vec<Conflict> = Vec::new();

    check_availability(ctx, &mut conflicts);
    check_blackouts(ctx, &mut conflicts);
    check_double_booking(ctx, &mut conflicts);
    check_workload(ctx, &mut conflicts)?;

    Ok(ConflictReport::from_conflicts(conflicts))
}

fn check_availability(ctx: &ScheduleContext<'_>, conflicts: &mut Vec<Conflict>) {
    // No rows at all means the pilot never opted into a schedule.
    if ctx.availability.is_empty() {
        return;
    }

    let weekday = ctx.date.weekday();
    let row = ctx.availability.iter().find(|a| a.weekday == weekday);

    match row {
        Some(row) if row.is_available => {
            let short_window = row
                .window_hours()
                .filter(|hours| *hours < ctx.duration_hours);
            if let Some(hours) = short_window {
                conflicts.push(Conflict {
                    conflict_type: ConflictType::AvailabilityWindow,
                    severity: Severity::Warning,
                    message: format!(
                        "Availability window on {} is {hours:.1}h, shorter than the {:.1}h job",
                        weekday_name(weekday),
                        ctx.duration_hours
                    ),
                    details: Some(ConflictDetails::AvailabilityWindow {
                        available_hours: hours,
                        required_hours: ctx.duration_hours,
                    }),
                });
            }
        }
        _ => conflicts.push(Conflict {
            conflict_type: ConflictType::Availability,
            severity: Severity::Error,
            message: format!("Pilot is not available on {}", weekday_name(weekday)),
            details: Some(ConflictDetails::Availability { weekday }),
        }),
    }
}

fn check_blackouts(ctx: &ScheduleContext<'_>, conflicts: &mut Vec<Conflict>) {
    let Some(blackout) = ctx.blackouts.iter().find(|b| b.covers(ctx.date)) else {
        return;
    };

    let message = blackout.reason.as_deref().map_or_else(
        || format!("Pilot is blacked out from {} to {}", blackout.start_date, blackout.end_date),
        |reason| format!("Pilot is blacked out: {reason}"),
    );

    conflicts.push(Conflict {
        conflict_type: ConflictType::Blackout,
        severity: Severity::Error,
        message,
        details: Some(ConflictDetails::Blackout {
            blackout_id: blackout.blackout_id,
            start_date: blackout.start_date,
            end_date: blackout.end_date,
            reason: blackout.reason.clone(),
        }),
    });
}

fn check_double_booking(ctx: &ScheduleContext<'_>, conflicts: &mut Vec<Conflict>) {
    if ctx.booked_jobs.is_empty() {
        return;
    }

    let names: Vec<String> = ctx
        .booked_jobs
        .iter()
        .map(|j| format!("#{} {}", j.job_id, j.name))
        .collect();

    conflicts.push(Conflict {
        conflict_type: ConflictType::DoubleBooking,
        severity: Severity::Error,
        message: format!(
            "Pilot is already assigned on {}: {}",
            ctx.date,
            names.join(", ")
        ),
        details: Some(ConflictDetails::DoubleBooking {
            jobs: ctx.booked_jobs.to_vec(),
        }),
    });
}

fn check_workload(
    ctx: &ScheduleContext<'_>,
    conflicts: &mut Vec<Conflict>,
) -> Result<(), DomainError> {
    let weekly_cap = ctx
        .limits
        .max_jobs_per_week
        .filter(|maximum| ctx.week_job_count >= *maximum);
    if let Some(maximum) = weekly_cap {
        conflicts.push(Conflict {
            conflict_type: ConflictType::WeeklyWorkload,
            severity: Severity::Warning,
            message: format!(
                "Pilot already has {} jobs this week (limit {maximum})",
                ctx.week_job_count
            ),
            details: Some(ConflictDetails::Workload {
                window: DateWindow::week_of(ctx.date)?,
                current: ctx.week_job_count,
                maximum,
            }),
        });
    }

    let monthly_cap = ctx
        .limits
        .max_jobs_per_month
        .filter(|maximum| ctx.month_job_count >= *maximum);
    if let Some(maximum) = monthly_cap {
        conflicts.push(Conflict {
            conflict_type: ConflictType::MonthlyWorkload,
            severity: Severity::Warning,
            message: format!(
                "Pilot already has {} jobs this month (limit {maximum})",
                ctx.month_job_count
            ),
            details: Some(ConflictDetails::Workload {
                window: DateWindow::month_of(ctx.date)?,
                current: ctx.month_job_count,
                maximum,
            }),
        });
    }

    Ok(())
}

const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
