// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry dates and timestamps as text; the handlers parse them so a
//! bad value is reported against the field that carried it.

use chrono::{DateTime, NaiveDate, Utc};
use flightline::GenerateResult;
use flightline_domain::{
    ConflictReport, Job, Pilot, PilotAvailability, PilotBlackout, PilotSuggestion, ProductLine,
    RecurringJobOccurrence, RecurringJobTemplate,
};
use serde::{Deserialize, Serialize};

fn default_timezone() -> String {
    String::from("UTC")
}

/// API request to create a template or replace its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRequest {
    pub name: String,
    #[serde(default)]
    pub is_manual: bool,
    pub site_id: i64,
    /// `organization` or `person`.
    pub client_type: String,
    pub client_id: i64,
    #[serde(default)]
    pub rrule: Option<String>,
    /// IANA timezone name.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub dtstart: Option<String>,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub dtend: Option<String>,
    /// Rolling window in days; defaults to 60.
    #[serde(default)]
    pub window_days: Option<u32>,
    #[serde(default)]
    pub payable_amount_cents: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductLine>,
    pub created_by: i64,
}

/// API response carrying one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateResponse {
    pub template: RecurringJobTemplate,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTemplateActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTemplateResponse {
    pub template_id: i64,
    pub message: String,
}

/// API request to generate occurrences for one template.
///
/// Omitted bounds fall back to the template's watermark and rolling window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOccurrencesRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub max_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOccurrencesResponse {
    pub template_id: i64,
    pub generated: usize,
    pub skipped: usize,
    pub occurrences: Vec<RecurringJobOccurrence>,
}

impl GenerateOccurrencesResponse {
    #[must_use]
    pub fn new(template_id: i64, result: GenerateResult) -> Self {
        Self {
            template_id,
            generated: result.generated,
            skipped: result.skipped,
            occurrences: result.occurrences,
        }
    }
}

/// Inclusive bounds for listing a template's occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOccurrencesQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceListResponse {
    pub template_id: i64,
    pub occurrences: Vec<RecurringJobOccurrence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOccurrenceStatusRequest {
    /// `planned`, `skipped`, or `cancelled`.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceResponse {
    pub occurrence: RecurringJobOccurrence,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoteOccurrenceResponse {
    pub occurrence_id: i64,
    pub job_id: i64,
}

/// API request to list upcoming instants of a rule without storing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub rrule: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub dtstart: String,
    /// Defaults to 10, capped at 500.
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub occurrences: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateRuleRequest {
    pub rrule: String,
}

/// Date and expected length used by the conflict checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictQuery {
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub duration_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReportResponse {
    pub pilot_id: i64,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub report: ConflictReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionQuery {
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub required_count: Option<usize>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub date: NaiveDate,
    pub required_count: usize,
    pub suggestions: Vec<PilotSuggestion>,
}

/// API request to register a pilot, staff member, or other user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePilotRequest {
    pub name: String,
    pub email: String,
    /// Any of `admin`, `staff`, `pilot`, `client`.
    pub roles: Vec<String>,
    #[serde(default)]
    pub max_jobs_per_week: Option<u32>,
    #[serde(default)]
    pub max_jobs_per_month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotResponse {
    pub pilot: Pilot,
    pub message: String,
}

/// One day of a weekly pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityDay {
    /// 0 = Sunday through 6 = Saturday.
    pub weekday: i32,
    pub is_available: bool,
    /// `HH:MM`.
    #[serde(default)]
    pub start_time: Option<String>,
    /// `HH:MM`.
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Replaces the whole weekly pattern. An empty list clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAvailabilityRequest {
    pub days: Vec<AvailabilityDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub pilot_id: i64,
    pub days: Vec<PilotAvailability>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBlackoutRequest {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackoutResponse {
    pub blackout: PilotBlackout,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleJobRequest {
    /// `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignPilotRequest {
    pub pilot_id: i64,
    #[serde(default)]
    pub duration_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResponse {
    pub job: Job,
    pub message: String,
}
