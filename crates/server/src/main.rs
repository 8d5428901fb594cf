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
#![allow(clippy::multiple_crate_versions)]

mod sweeper;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use flightline::{DEFAULT_MAX_COUNT, SystemClock};
use flightline_api::{
    ApiError, AssignPilotRequest, AssignmentCheck, AvailabilityResponse, BlackoutResponse,
    ConflictQuery, ConflictReportResponse, CreateBlackoutRequest, CreatePilotRequest,
    DeleteTemplateResponse, GenerateOccurrencesRequest, GenerateOccurrencesResponse, JobResponse,
    ListOccurrencesQuery, OccurrenceListResponse, OccurrenceResponse, PilotResponse,
    PreviewRequest, PreviewResponse, PromoteOccurrenceResponse, RuleValidation,
    ScheduleJobRequest, SetAvailabilityRequest, SetOccurrenceStatusRequest,
    SetTemplateActiveRequest, SuggestionQuery, SuggestionsResponse, SweepResult, TemplateRequest,
    TemplateResponse, ValidateRuleRequest,
};
use flightline_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Flightline Server - recurring work generation and pilot assignment over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Seconds between background sweeps; 0 disables them
    #[arg(long, default_value_t = 300)]
    sweep_interval_secs: u64,

    /// Occurrence cap per template when a request or sweep does not give one
    #[arg(long, default_value_t = DEFAULT_MAX_COUNT)]
    default_max_count: usize,
}

/// Application state shared across handlers.
///
/// The store sits behind one async mutex; every handler and the background
/// sweep take it for the length of a single operation.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    default_max_count: usize,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::DomainRuleViolation { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

type HttpResult<T> = Result<Json<T>, HttpError>;

// ============================================================================
// Templates and occurrences
// ============================================================================

/// Handler for POST `/templates` endpoint.
async fn handle_create_template(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<TemplateRequest>,
) -> Result<(StatusCode, Json<TemplateResponse>), HttpError> {
    info!(name = %req.name, manual = req.is_manual, "Handling create_template request");
    let mut persistence = app_state.persistence.lock().await;
    let response = flightline_api::create_template(&mut *persistence, &req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/templates/{id}` endpoint.
async fn handle_get_template(
    AxumState(app_state): AxumState<AppState>,
    Path(template_id): Path<i64>,
) -> HttpResult<TemplateResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::get_template(
        &mut *persistence,
        template_id,
    )?))
}

/// Handler for PUT `/templates/{id}` endpoint.
async fn handle_update_template(
    AxumState(app_state): AxumState<AppState>,
    Path(template_id): Path<i64>,
    Json(req): Json<TemplateRequest>,
) -> HttpResult<TemplateResponse> {
    info!(template_id, "Handling update_template request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::update_template(
        &mut *persistence,
        template_id,
        &req,
    )?))
}

/// Handler for DELETE `/templates/{id}` endpoint.
async fn handle_delete_template(
    AxumState(app_state): AxumState<AppState>,
    Path(template_id): Path<i64>,
) -> HttpResult<DeleteTemplateResponse> {
    info!(template_id, "Handling delete_template request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::delete_template(
        &mut *persistence,
        template_id,
    )?))
}

/// Handler for POST `/templates/{id}/active` endpoint.
async fn handle_set_template_active(
    AxumState(app_state): AxumState<AppState>,
    Path(template_id): Path<i64>,
    Json(req): Json<SetTemplateActiveRequest>,
) -> HttpResult<TemplateResponse> {
    info!(template_id, active = req.is_active, "Handling set_template_active request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::set_template_active(
        &mut *persistence,
        template_id,
        req,
    )?))
}

/// Handler for POST `/templates/{id}/generate` endpoint.
///
/// Takes a JSON body; send `{}` to use the template's own window.
async fn handle_generate(
    AxumState(app_state): AxumState<AppState>,
    Path(template_id): Path<i64>,
    Json(req): Json<GenerateOccurrencesRequest>,
) -> HttpResult<GenerateOccurrencesResponse> {
    info!(template_id, "Handling generate request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::generate_occurrences(
        &mut *persistence,
        SystemClock,
        template_id,
        &req,
        app_state.default_max_count,
    )?))
}

/// Handler for GET `/templates/{id}/occurrences` endpoint.
async fn handle_list_occurrences(
    AxumState(app_state): AxumState<AppState>,
    Path(template_id): Path<i64>,
    Query(query): Query<ListOccurrencesQuery>,
) -> HttpResult<OccurrenceListResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::list_occurrences(
        &mut *persistence,
        template_id,
        &query,
    )?))
}

/// Handler for POST `/occurrences/{id}/promote` endpoint.
async fn handle_promote(
    AxumState(app_state): AxumState<AppState>,
    Path(occurrence_id): Path<i64>,
) -> HttpResult<PromoteOccurrenceResponse> {
    info!(occurrence_id, "Handling promote request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::promote_occurrence(
        &mut *persistence,
        occurrence_id,
    )?))
}

/// Handler for POST `/occurrences/{id}/status` endpoint.
async fn handle_set_occurrence_status(
    AxumState(app_state): AxumState<AppState>,
    Path(occurrence_id): Path<i64>,
    Json(req): Json<SetOccurrenceStatusRequest>,
) -> HttpResult<OccurrenceResponse> {
    info!(occurrence_id, status = %req.status, "Handling set_occurrence_status request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::set_occurrence_status(
        &mut *persistence,
        occurrence_id,
        &req,
    )?))
}

/// Handler for POST `/recurrence/preview` endpoint.
async fn handle_preview(Json(req): Json<PreviewRequest>) -> HttpResult<PreviewResponse> {
    Ok(Json(flightline_api::preview(&req)?))
}

/// Handler for POST `/recurrence/validate` endpoint.
async fn handle_validate(Json(req): Json<ValidateRuleRequest>) -> Json<RuleValidation> {
    Json(flightline_api::validate(&req))
}

/// Handler for POST `/sweep` endpoint.
async fn handle_sweep(AxumState(app_state): AxumState<AppState>) -> HttpResult<SweepResult> {
    info!("Handling sweep request");
    let result = sweeper::run_sweep(&app_state.persistence, app_state.default_max_count).await?;
    Ok(Json(result))
}

// ============================================================================
// Pilots, jobs, and assignment
// ============================================================================

/// Handler for POST `/pilots` endpoint.
async fn handle_create_pilot(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreatePilotRequest>,
) -> Result<(StatusCode, Json<PilotResponse>), HttpError> {
    info!(roles = req.roles.len(), "Handling create_pilot request");
    let mut persistence = app_state.persistence.lock().await;
    let response = flightline_api::register_pilot(&mut *persistence, &req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/pilots/{id}` endpoint.
async fn handle_get_pilot(
    AxumState(app_state): AxumState<AppState>,
    Path(pilot_id): Path<i64>,
) -> HttpResult<PilotResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::get_pilot(&mut *persistence, pilot_id)?))
}

/// Handler for PUT `/pilots/{id}/availability` endpoint.
async fn handle_set_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(pilot_id): Path<i64>,
    Json(req): Json<SetAvailabilityRequest>,
) -> HttpResult<AvailabilityResponse> {
    info!(pilot_id, days = req.days.len(), "Handling set_availability request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::set_availability(
        &mut *persistence,
        pilot_id,
        &req,
    )?))
}

/// Handler for POST `/pilots/{id}/blackouts` endpoint.
async fn handle_add_blackout(
    AxumState(app_state): AxumState<AppState>,
    Path(pilot_id): Path<i64>,
    Json(req): Json<CreateBlackoutRequest>,
) -> Result<(StatusCode, Json<BlackoutResponse>), HttpError> {
    info!(pilot_id, "Handling add_blackout request");
    let mut persistence = app_state.persistence.lock().await;
    let response = flightline_api::add_blackout(&mut *persistence, pilot_id, &req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/pilots/{id}/conflicts` endpoint.
async fn handle_detect_conflicts(
    AxumState(app_state): AxumState<AppState>,
    Path(pilot_id): Path<i64>,
    Query(query): Query<ConflictQuery>,
) -> HttpResult<ConflictReportResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::detect_conflicts(
        &mut *persistence,
        pilot_id,
        &query,
    )?))
}

/// Handler for GET `/pilots/{id}/can_assign` endpoint.
async fn handle_can_assign(
    AxumState(app_state): AxumState<AppState>,
    Path(pilot_id): Path<i64>,
    Query(query): Query<ConflictQuery>,
) -> HttpResult<AssignmentCheck> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::can_assign(
        &mut *persistence,
        pilot_id,
        &query,
    )?))
}

/// Handler for GET `/suggestions` endpoint.
async fn handle_suggestions(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> HttpResult<SuggestionsResponse> {
    info!(date = %query.date, "Handling suggestions request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::suggest_pilots(
        &mut *persistence,
        &query,
    )?))
}

/// Handler for GET `/jobs/{id}` endpoint.
async fn handle_get_job(
    AxumState(app_state): AxumState<AppState>,
    Path(job_id): Path<i64>,
) -> HttpResult<JobResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::get_job(&mut *persistence, job_id)?))
}

/// Handler for POST `/jobs/{id}/schedule` endpoint.
async fn handle_schedule_job(
    AxumState(app_state): AxumState<AppState>,
    Path(job_id): Path<i64>,
    Json(req): Json<ScheduleJobRequest>,
) -> HttpResult<JobResponse> {
    info!(job_id, date = %req.date, "Handling schedule_job request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::schedule_job(
        &mut *persistence,
        job_id,
        &req,
    )?))
}

/// Handler for POST `/jobs/{id}/assignments` endpoint.
async fn handle_assign_pilot(
    AxumState(app_state): AxumState<AppState>,
    Path(job_id): Path<i64>,
    Json(req): Json<AssignPilotRequest>,
) -> HttpResult<JobResponse> {
    info!(job_id, pilot_id = req.pilot_id, "Handling assign_pilot request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(flightline_api::assign_pilot(
        &mut *persistence,
        job_id,
        &req,
    )?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/templates", post(handle_create_template))
        .route(
            "/templates/{id}",
            get(handle_get_template)
                .put(handle_update_template)
                .delete(handle_delete_template),
        )
        .route("/templates/{id}/active", post(handle_set_template_active))
        .route("/templates/{id}/generate", post(handle_generate))
        .route("/templates/{id}/occurrences", get(handle_list_occurrences))
        .route("/occurrences/{id}/promote", post(handle_promote))
        .route("/occurrences/{id}/status", post(handle_set_occurrence_status))
        .route("/recurrence/preview", post(handle_preview))
        .route("/recurrence/validate", post(handle_validate))
        .route("/pilots", post(handle_create_pilot))
        .route("/pilots/{id}", get(handle_get_pilot))
        .route("/pilots/{id}/availability", put(handle_set_availability))
        .route("/pilots/{id}/blackouts", post(handle_add_blackout))
        .route("/pilots/{id}/conflicts", get(handle_detect_conflicts))
        .route("/pilots/{id}/can_assign", get(handle_can_assign))
        .route("/suggestions", get(handle_suggestions))
        .route("/jobs/{id}", get(handle_get_job))
        .route("/jobs/{id}/schedule", post(handle_schedule_job))
        .route("/jobs/{id}/assignments", post(handle_assign_pilot))
        .route("/sweep", post(handle_sweep))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Flightline Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        default_max_count: args.default_max_count,
    };

    let _sweeper = sweeper::spawn(
        Arc::clone(&app_state.persistence),
        Duration::from_secs(args.sweep_interval_secs),
        args.default_max_count,
    );

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
