// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use flightline_domain::{DomainError, OccurrenceStatus};

/// Errors reported by store implementations.
///
/// Store backends convert their own failures into this type at the trait
/// boundary so the engines never depend on a particular backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    Unavailable(String),
    /// Stored data could not be decoded.
    Corrupt(String),
    /// Any other backend failure.
    Other(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
            Self::Corrupt(msg) => write!(f, "Stored data is corrupt: {msg}"),
            Self::Other(msg) => write!(f, "Store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors that can occur while running the engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated, including unparsable recurrence rules.
    DomainViolation(DomainError),
    /// The store failed.
    Store(StoreError),
    TemplateNotFound(i64),
    OccurrenceNotFound(i64),
    PilotNotFound(i64),
    JobNotFound(i64),
    /// A template cannot be deleted while occurrences have become jobs.
    TemplateHasMaterializedJobs {
        /// The template that was to be deleted.
        template_id: i64,
        /// Number of occurrences already promoted to jobs.
        job_count: u64,
    },
    /// The occurrence is already linked to a job and cannot change status.
    OccurrenceAlreadyCreated {
        /// The occurrence.
        occurrence_id: i64,
        /// The job it is linked to.
        job_id: Option<i64>,
    },
    /// The requested status change is not allowed.
    InvalidStatusTransition {
        /// The occurrence.
        occurrence_id: i64,
        /// Current status.
        from: OccurrenceStatus,
        /// Requested status.
        to: OccurrenceStatus,
    },
    /// A recurring template has neither a dtstart nor a DTSTART line.
    MissingStart(i64),
    /// Assignment needs a job with a scheduled date.
    JobNotScheduled(i64),
    /// A hard scheduling constraint blocks the assignment.
    SchedulingRejected {
        /// The pilot that could not be assigned.
        pilot_id: i64,
        /// Message of the first blocking conflict.
        reason: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::TemplateNotFound(id) => write!(f, "Template {id} not found"),
            Self::OccurrenceNotFound(id) => write!(f, "Occurrence {id} not found"),
            Self::PilotNotFound(id) => write!(f, "Pilot {id} not found"),
            Self::JobNotFound(id) => write!(f, "Job {id} not found"),
            Self::TemplateHasMaterializedJobs {
                template_id,
                job_count,
            } => write!(
                f,
                "Template {template_id} cannot be deleted: {job_count} occurrence(s) already have jobs"
            ),
            Self::OccurrenceAlreadyCreated {
                occurrence_id,
                job_id,
            } => match job_id {
                Some(job_id) => write!(
                    f,
                    "Occurrence {occurrence_id} is already linked to job {job_id}"
                ),
                None => write!(f, "Occurrence {occurrence_id} is already created"),
            },
            Self::InvalidStatusTransition {
                occurrence_id,
                from,
                to,
            } => write!(
                f,
                "Occurrence {occurrence_id} cannot move from {from} to {to}"
            ),
            Self::MissingStart(id) => write!(
                f,
                "Template {id} has a recurrence rule but no start date"
            ),
            Self::JobNotScheduled(id) => write!(f, "Job {id} has no scheduled date"),
            Self::SchedulingRejected { pilot_id, reason } => {
                write!(f, "Pilot {pilot_id} cannot be assigned: {reason}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
