// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.
//!
//! Each handler parses its request, runs one core operation against the
//! store it is given, and shapes the response. Handlers never hold state
//! between calls.

use crate::error::{ApiError, translate_domain_error};
use crate::input::{
    parse_count, parse_date, parse_duration, parse_optional_time, parse_optional_timestamp,
    parse_timestamp, parse_weekday,
};
use crate::request_response::{
    AssignPilotRequest, AvailabilityResponse, BlackoutResponse, ConflictQuery,
    ConflictReportResponse, CreateBlackoutRequest, CreatePilotRequest, DeleteTemplateResponse,
    GenerateOccurrencesRequest, GenerateOccurrencesResponse, JobResponse, ListOccurrencesQuery,
    OccurrenceListResponse, OccurrenceResponse, PilotResponse, PreviewRequest, PreviewResponse,
    PromoteOccurrenceResponse, ScheduleJobRequest, SetAvailabilityRequest,
    SetOccurrenceStatusRequest, SetTemplateActiveRequest, SuggestionQuery, SuggestionsResponse,
    TemplateRequest, TemplateResponse, ValidateRuleRequest,
};
use chrono::{DateTime, NaiveDate, Utc};
use flightline::{
    AssignmentCheck, Clock, GenerateRequest, JobStore, OccurrenceGenerator, OccurrenceStore,
    PilotStore, Store, SweepCoordinator, SweepResult, TemplateStore,
};
use flightline_domain::{
    ClientRef, ClientType, DEFAULT_WINDOW_DAYS, DateWindow, NewPilot, OccurrenceStatus,
    PilotAvailability, Role, RuleValidation, TemplateDraft, WorkloadLimits, preview_occurrences,
    validate_rule,
};
use tracing::debug;

/// Default number of instants returned by a rule preview.
pub const DEFAULT_PREVIEW_COUNT: usize = 10;
/// Largest rule preview a caller may request.
pub const MAX_PREVIEW_COUNT: usize = 500;

/// Converts a template request into a domain draft.
///
/// # Errors
///
/// Returns an error if the client type or a timestamp does not parse.
pub fn draft_from_request(request: &TemplateRequest) -> Result<TemplateDraft, ApiError> {
    let client_type: ClientType = request
        .client_type
        .parse()
        .map_err(translate_domain_error)?;

    Ok(TemplateDraft {
        name: request.name.trim().to_string(),
        is_manual: request.is_manual,
        site_id: request.site_id,
        client: ClientRef {
            client_type,
            client_id: request.client_id,
        },
        rrule: request
            .rrule
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
        timezone: request.timezone.clone(),
        dtstart: parse_optional_timestamp("dtstart", request.dtstart.as_deref())?,
        dtend: parse_optional_timestamp("dtend", request.dtend.as_deref())?,
        window_days: request.window_days.unwrap_or(DEFAULT_WINDOW_DAYS),
        payable_amount_cents: request.payable_amount_cents,
        notes: request.notes.clone(),
        products: request.products.clone(),
        created_by: request.created_by,
    })
}

/// Creates a recurring or manual template.
///
/// # Arguments
///
/// * `store` - Template storage
/// * `request` - The template definition
///
/// # Errors
///
/// Returns an error if:
/// - A field does not parse
/// - The definition is invalid, including an unparsable recurrence rule
/// - The store fails
pub fn create_template<S>(
    store: &mut S,
    request: &TemplateRequest,
) -> Result<TemplateResponse, ApiError>
where
    S: TemplateStore + ?Sized,
{
    let draft: TemplateDraft = draft_from_request(request)?;
    let template = flightline::create_template(store, &draft)?;
    Ok(TemplateResponse {
        message: format!("Created template '{}'", template.name()),
        template,
    })
}

/// # Errors
///
/// Returns an error if the template does not exist or the store fails.
pub fn get_template<S>(store: &mut S, template_id: i64) -> Result<TemplateResponse, ApiError>
where
    S: TemplateStore + ?Sized,
{
    let template = flightline::get_template(store, template_id)?;
    Ok(TemplateResponse {
        message: format!("Template {template_id}"),
        template,
    })
}

/// Replaces a template's definition.
///
/// The active flag and generation watermark are kept. Occurrences already
/// generated are left as they are.
///
/// # Errors
///
/// Returns an error if the definition is invalid, the template does not
/// exist, or the store fails.
pub fn update_template<S>(
    store: &mut S,
    template_id: i64,
    request: &TemplateRequest,
) -> Result<TemplateResponse, ApiError>
where
    S: TemplateStore + ?Sized,
{
    let draft: TemplateDraft = draft_from_request(request)?;
    let template = flightline::update_template(store, template_id, &draft)?;
    Ok(TemplateResponse {
        message: format!("Updated template '{}'", template.name()),
        template,
    })
}

/// # Errors
///
/// Returns an error if the template does not exist or the store fails.
pub fn set_template_active<S>(
    store: &mut S,
    template_id: i64,
    request: SetTemplateActiveRequest,
) -> Result<TemplateResponse, ApiError>
where
    S: TemplateStore + ?Sized,
{
    let template = flightline::set_template_active(store, template_id, request.is_active)?;
    let verb: &str = if template.is_active {
        "Activated"
    } else {
        "Deactivated"
    };
    Ok(TemplateResponse {
        message: format!("{verb} template '{}'", template.name()),
        template,
    })
}

/// Deletes a template that has produced no jobs.
///
/// # Errors
///
/// Returns `ApiError::DomainRuleViolation` carrying the job count if any
/// occurrence has been promoted, `ApiError::ResourceNotFound` if the template
/// does not exist, or `ApiError::Internal` if the store fails.
pub fn delete_template<S>(
    store: &mut S,
    template_id: i64,
) -> Result<DeleteTemplateResponse, ApiError>
where
    S: TemplateStore + OccurrenceStore + ?Sized,
{
    flightline::delete_template(store, template_id)?;
    Ok(DeleteTemplateResponse {
        template_id,
        message: format!("Deleted template {template_id} and its occurrences"),
    })
}

/// Generates occurrences for one template.
///
/// # Arguments
///
/// * `store` - Template and occurrence storage
/// * `clock` - Source of "now" for the rolling window
/// * `template_id` - The template to expand
/// * `request` - Optional bounds and cap
/// * `default_max_count` - Cap used when the request does not give one
///
/// # Errors
///
/// Returns an error if:
/// - A bound or the cap does not parse
/// - The template does not exist
/// - The stored rule cannot be expanded
/// - The store fails
pub fn generate_occurrences<S, C>(
    store: &mut S,
    clock: C,
    template_id: i64,
    request: &GenerateOccurrencesRequest,
    default_max_count: usize,
) -> Result<GenerateOccurrencesResponse, ApiError>
where
    S: TemplateStore + OccurrenceStore + ?Sized,
    C: Clock,
{
    let max_count: usize = parse_count("max_count", request.max_count, default_max_count)?;
    let mut generate = GenerateRequest::new(template_id).max_count(max_count);
    if let Some(from) = parse_optional_timestamp("from", request.from.as_deref())? {
        generate = generate.starting_at(from);
    }
    if let Some(to) = parse_optional_timestamp("to", request.to.as_deref())? {
        generate = generate.ending_at(to);
    }

    debug!(
        template_id,
        max_count,
        from = ?generate.from,
        to = ?generate.to,
        "Generating on request"
    );
    let result = OccurrenceGenerator::new(clock).generate(store, generate)?;
    Ok(GenerateOccurrencesResponse::new(template_id, result))
}

/// # Errors
///
/// Returns an error if a bound does not parse, the template does not exist,
/// or the store fails.
pub fn list_occurrences<S>(
    store: &mut S,
    template_id: i64,
    query: &ListOccurrencesQuery,
) -> Result<OccurrenceListResponse, ApiError>
where
    S: TemplateStore + OccurrenceStore + ?Sized,
{
    let from: Option<DateTime<Utc>> = parse_optional_timestamp("from", query.from.as_deref())?;
    let to: Option<DateTime<Utc>> = parse_optional_timestamp("to", query.to.as_deref())?;
    let occurrences = flightline::list_occurrences(store, template_id, from, to)?;
    Ok(OccurrenceListResponse {
        template_id,
        occurrences,
    })
}

/// Turns an occurrence into a job. Repeating the call returns the same job.
///
/// # Errors
///
/// Returns an error if the occurrence or its template does not exist, or
/// the store fails.
pub fn promote_occurrence<S>(
    store: &mut S,
    occurrence_id: i64,
) -> Result<PromoteOccurrenceResponse, ApiError>
where
    S: TemplateStore + OccurrenceStore + JobStore + ?Sized,
{
    let job_id: i64 = flightline::promote_occurrence(store, occurrence_id)?;
    Ok(PromoteOccurrenceResponse {
        occurrence_id,
        job_id,
    })
}

/// # Errors
///
/// Returns an error if the status does not parse, the occurrence does not
/// exist or is already a job, or the store fails.
pub fn set_occurrence_status<S>(
    store: &mut S,
    occurrence_id: i64,
    request: &SetOccurrenceStatusRequest,
) -> Result<OccurrenceResponse, ApiError>
where
    S: OccurrenceStore + ?Sized,
{
    let status: OccurrenceStatus = request.status.parse().map_err(translate_domain_error)?;
    let occurrence = flightline::set_occurrence_status(store, occurrence_id, status)?;
    Ok(OccurrenceResponse {
        message: format!("Occurrence {occurrence_id} is now {status}"),
        occurrence,
    })
}

/// Lists upcoming instants of a rule.
///
/// An unparsable rule or timezone yields an empty list rather than an error.
///
/// # Errors
///
/// Returns an error if `dtstart` does not parse or `count` is zero.
pub fn preview(request: &PreviewRequest) -> Result<PreviewResponse, ApiError> {
    let dtstart: DateTime<Utc> = parse_timestamp("dtstart", &request.dtstart)?;
    let count: usize =
        parse_count("count", request.count, DEFAULT_PREVIEW_COUNT)?.min(MAX_PREVIEW_COUNT);
    let occurrences: Vec<DateTime<Utc>> =
        preview_occurrences(&request.rrule, &request.timezone, dtstart, count);
    if occurrences.is_empty() {
        debug!(rule = %request.rrule, timezone = %request.timezone, "Preview produced no instants");
    }
    Ok(PreviewResponse { occurrences })
}

#[must_use]
pub fn validate(request: &ValidateRuleRequest) -> RuleValidation {
    validate_rule(&request.rrule)
}

fn conflict_inputs(query: &ConflictQuery) -> Result<(NaiveDate, f64), ApiError> {
    let date: NaiveDate = parse_date("date", &query.date)?;
    let hours: f64 = parse_duration(
        "duration_hours",
        query.duration_hours,
        flightline::DEFAULT_DURATION_HOURS,
    )?;
    Ok((date, hours))
}

/// Evaluates every conflict rule for a pilot on a date.
///
/// # Errors
///
/// Returns an error if the query does not parse, the pilot does not exist,
/// or the store fails. Having conflicts is not an error.
pub fn detect_conflicts<S>(
    store: &mut S,
    pilot_id: i64,
    query: &ConflictQuery,
) -> Result<ConflictReportResponse, ApiError>
where
    S: PilotStore + JobStore + ?Sized,
{
    let (date, hours) = conflict_inputs(query)?;
    let report = flightline::detect_conflicts(store, pilot_id, date, hours)?;
    Ok(ConflictReportResponse {
        pilot_id,
        date,
        report,
    })
}

/// # Errors
///
/// Returns an error if the query does not parse, the pilot does not exist,
/// or the store fails.
pub fn can_assign<S>(
    store: &mut S,
    pilot_id: i64,
    query: &ConflictQuery,
) -> Result<AssignmentCheck, ApiError>
where
    S: PilotStore + JobStore + ?Sized,
{
    let (date, hours) = conflict_inputs(query)?;
    Ok(flightline::can_assign_pilot(store, pilot_id, date, hours)?)
}

/// Ranks candidate pilots for a date.
///
/// # Errors
///
/// Returns an error if the query does not parse or the store fails.
pub fn suggest_pilots<S>(
    store: &mut S,
    query: &SuggestionQuery,
) -> Result<SuggestionsResponse, ApiError>
where
    S: PilotStore + JobStore + ?Sized,
{
    let date: NaiveDate = parse_date("date", &query.date)?;
    let required_count: usize = parse_count(
        "required_count",
        query.required_count,
        flightline::DEFAULT_REQUIRED_COUNT,
    )?;
    let hours: f64 = parse_duration(
        "duration_hours",
        query.duration_hours,
        flightline::DEFAULT_DURATION_HOURS,
    )?;
    let suggestions = flightline::suggest_pilots(store, date, required_count, hours)?;
    Ok(SuggestionsResponse {
        date,
        required_count,
        suggestions,
    })
}

/// Runs one sweep over every active recurring template.
///
/// # Errors
///
/// Returns an error only if the template list cannot be read. Failures on
/// individual templates are reported inside the result.
pub fn sweep<S, C>(store: &mut S, clock: C, max_count: usize) -> Result<SweepResult, ApiError>
where
    S: Store + ?Sized,
    C: Clock + Clone,
{
    Ok(SweepCoordinator::with_max_count(clock, max_count).sweep(store)?)
}

/// Registers a user with its roles and workload limits.
///
/// # Errors
///
/// Returns an error if a role does not parse, the profile is invalid, or the
/// store fails (including a duplicate email).
pub fn register_pilot<S>(
    store: &mut S,
    request: &CreatePilotRequest,
) -> Result<PilotResponse, ApiError>
where
    S: PilotStore + ?Sized,
{
    let roles: Vec<Role> = request
        .roles
        .iter()
        .map(|r| r.parse::<Role>())
        .collect::<Result<_, _>>()
        .map_err(translate_domain_error)?;

    let pilot = flightline::register_pilot(
        store,
        &NewPilot {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            roles,
            limits: WorkloadLimits {
                max_jobs_per_week: request.max_jobs_per_week,
                max_jobs_per_month: request.max_jobs_per_month,
            },
        },
    )?;
    Ok(PilotResponse {
        message: format!("Registered '{}'", pilot.name),
        pilot,
    })
}

/// # Errors
///
/// Returns an error if the pilot does not exist or the store fails.
pub fn get_pilot<S>(store: &mut S, pilot_id: i64) -> Result<PilotResponse, ApiError>
where
    S: PilotStore + ?Sized,
{
    let pilot = flightline::get_pilot(store, pilot_id)?;
    Ok(PilotResponse {
        message: format!("Pilot {pilot_id}"),
        pilot,
    })
}

/// Replaces a pilot's weekly pattern.
///
/// # Errors
///
/// Returns an error if a weekday or time does not parse, a day repeats or
/// has an inverted window, the pilot does not exist, or the store fails.
pub fn set_availability<S>(
    store: &mut S,
    pilot_id: i64,
    request: &SetAvailabilityRequest,
) -> Result<AvailabilityResponse, ApiError>
where
    S: PilotStore + ?Sized,
{
    let mut rows: Vec<PilotAvailability> = Vec::with_capacity(request.days.len());
    for day in &request.days {
        rows.push(PilotAvailability {
            pilot_id,
            weekday: parse_weekday("weekday", day.weekday)?,
            is_available: day.is_available,
            start_time: parse_optional_time("start_time", day.start_time.as_deref())?,
            end_time: parse_optional_time("end_time", day.end_time.as_deref())?,
        });
    }

    let days = flightline::set_availability(store, pilot_id, &rows)?;
    Ok(AvailabilityResponse { pilot_id, days })
}

/// # Errors
///
/// Returns an error if a date does not parse, the range is inverted, the
/// pilot does not exist, or the store fails.
pub fn add_blackout<S>(
    store: &mut S,
    pilot_id: i64,
    request: &CreateBlackoutRequest,
) -> Result<BlackoutResponse, ApiError>
where
    S: PilotStore + ?Sized,
{
    let window = DateWindow::new(
        parse_date("start_date", &request.start_date)?,
        parse_date("end_date", &request.end_date)?,
    )
    .map_err(translate_domain_error)?;

    let blackout = flightline::add_blackout(store, pilot_id, window, request.reason.as_deref())?;
    Ok(BlackoutResponse {
        message: format!(
            "Pilot {pilot_id} unavailable from {} to {}",
            blackout.start_date, blackout.end_date
        ),
        blackout,
    })
}

/// # Errors
///
/// Returns an error if the job does not exist or the store fails.
pub fn get_job<S>(store: &mut S, job_id: i64) -> Result<JobResponse, ApiError>
where
    S: JobStore + ?Sized,
{
    let job = flightline::get_job(store, job_id)?;
    Ok(JobResponse {
        message: format!("Job {job_id}"),
        job,
    })
}

/// # Errors
///
/// Returns an error if the date does not parse, the job does not exist, or
/// the store fails.
pub fn schedule_job<S>(
    store: &mut S,
    job_id: i64,
    request: &ScheduleJobRequest,
) -> Result<JobResponse, ApiError>
where
    S: JobStore + ?Sized,
{
    let date: NaiveDate = parse_date("date", &request.date)?;
    let job = flightline::schedule_job(store, job_id, date)?;
    Ok(JobResponse {
        message: format!("Job {job_id} scheduled for {date}"),
        job,
    })
}

/// Adds a pilot to a scheduled job.
///
/// # Errors
///
/// Returns `ApiError::DomainRuleViolation` with the blocking reason if a hard
/// constraint prevents the assignment, or another error if the job or pilot
/// does not exist, the job is unscheduled, or the store fails.
pub fn assign_pilot<S>(
    store: &mut S,
    job_id: i64,
    request: &AssignPilotRequest,
) -> Result<JobResponse, ApiError>
where
    S: JobStore + PilotStore + ?Sized,
{
    let hours: f64 = parse_duration(
        "duration_hours",
        request.duration_hours,
        flightline::DEFAULT_DURATION_HOURS,
    )?;
    let job = flightline::assign_pilot(store, job_id, request.pilot_id, hours)?;
    Ok(JobResponse {
        message: format!("Pilot {} assigned to job {job_id}", request.pilot_id),
        job,
    })
}
