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
    clippy::unwrap_used,
    clippy::expect_used
)]

//! API boundary for the scheduling engines.
//!
//! Requests arrive as plain data with text dates. Handlers parse them, call
//! into `flightline`, and translate every failure into [`ApiError`], which
//! is the only error type a transport needs to understand.

mod error;
mod handlers;
mod input;
mod request_response;

#[cfg(test)]
mod tests;

// ============================================================================
// Errors
// ============================================================================

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use input::InputError;

// ============================================================================
// Handlers
// ============================================================================

pub use handlers::{
    DEFAULT_PREVIEW_COUNT, MAX_PREVIEW_COUNT, add_blackout, assign_pilot, can_assign,
    create_template, delete_template, detect_conflicts, draft_from_request,
    generate_occurrences, get_job, get_pilot, get_template, list_occurrences, preview,
    promote_occurrence, register_pilot, schedule_job, set_availability, set_occurrence_status,
    set_template_active, suggest_pilots, sweep, update_template, validate,
};

// ============================================================================
// Request / response types
// ============================================================================

pub use request_response::{
    AssignPilotRequest, AvailabilityDay, AvailabilityResponse, BlackoutResponse, ConflictQuery,
    ConflictReportResponse, CreateBlackoutRequest, CreatePilotRequest, DeleteTemplateResponse,
    GenerateOccurrencesRequest, GenerateOccurrencesResponse, JobResponse, ListOccurrencesQuery,
    OccurrenceListResponse, OccurrenceResponse, PilotResponse, PreviewRequest, PreviewResponse,
    PromoteOccurrenceResponse, ScheduleJobRequest, SetAvailabilityRequest,
    SetOccurrenceStatusRequest, SetTemplateActiveRequest, SuggestionQuery, SuggestionsResponse,
    TemplateRequest, TemplateResponse, ValidateRuleRequest,
};

// Engine results returned unchanged.
pub use flightline::{AssignmentCheck, SweepResult};
pub use flightline_domain::RuleValidation;
