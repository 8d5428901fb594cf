// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! Recurring work generation and pilot assignment.
//!
//! Every engine receives its store handle per call, so the same code runs
//! against the `SQLite` backend and against in-memory fakes.

mod clock;
mod conflicts;
mod error;
mod generator;
mod jobs;
mod optimizer;
mod pilots;
mod promoter;
mod store;
mod sweep;
mod templates;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use clock::{Clock, FixedClock, SystemClock};
pub use conflicts::{AssignmentCheck, can_assign_pilot, detect_conflicts};
pub use error::{CoreError, StoreError};
pub use generator::{DEFAULT_MAX_COUNT, GenerateRequest, GenerateResult, OccurrenceGenerator};
pub use jobs::{assign_pilot, get_job, schedule_job};
pub use optimizer::{DEFAULT_DURATION_HOURS, DEFAULT_REQUIRED_COUNT, suggest_pilots};
pub use pilots::{add_blackout, get_pilot, register_pilot, set_availability};
pub use promoter::promote_occurrence;
pub use store::{
    InsertOutcome, JobStore, LinkOutcome, OccurrenceStore, PilotStore, Store, TemplateStore,
};
pub use sweep::{SweepCoordinator, SweepFailure, SweepResult};
pub use templates::{
    create_template, delete_template, get_template, list_occurrences, set_occurrence_status,
    set_template_active, update_template,
};
