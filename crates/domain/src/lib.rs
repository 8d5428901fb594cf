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

mod calendar;
mod conflict;
mod error;
mod job;
mod pilot;
mod recurrence;
mod scoring;
mod template;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use calendar::DateWindow;
pub use conflict::{
    Conflict, ConflictDetails, ConflictReport, ConflictType, ScheduleContext, Severity,
    evaluate_conflicts,
};
pub use recurrence::{
    Frequency, Occurrences, RecurrenceRule, RuleValidation, Until, WeekdaySpec, parse_rule,
    parse_timezone, preview_occurrences, validate_rule,
};
pub use scoring::{
    BASE_SCORE, ERROR_PENALTY, MIN_SUGGESTIONS, PilotSuggestion, WARNING_PENALTY,
    build_suggestion, rank_suggestions, score_candidate, suggestion_limit,
};

// Re-export public types
pub use error::DomainError;
pub use job::{Job, JobMetadata, JobSummary, NewJob};
pub use pilot::{
    NewPilot, Pilot, PilotAvailability, PilotBlackout, weekday_from_index, weekday_index,
};
pub use template::{
    DEFAULT_WINDOW_DAYS, RecurringJobOccurrence, RecurringJobTemplate, TemplateDraft,
};
pub use types::{
    ClientRef, ClientType, OccurrenceStatus, PipelineStage, ProductLine, Role, WorkloadLimits,
};
pub use validation::{
    MAX_WINDOW_DAYS, validate_availability, validate_blackout, validate_pilot, validate_template,
};
