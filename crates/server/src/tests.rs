// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Helper to create test app state with in-memory persistence.
fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        default_max_count: DEFAULT_MAX_COUNT,
    }
}

fn template_body() -> Value {
    json!({
        "name": "Solar farm thermal inspection",
        "site_id": 11,
        "client_type": "organization",
        "client_id": 3,
        "rrule": "FREQ=WEEKLY;BYDAY=MO",
        "timezone": "UTC",
        "dtstart": "2025-01-06T09:00:00Z",
        "created_by": 1
    })
}

/// Sends one request and returns the status with the decoded JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (HttpStatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, value)
}

async fn create_template(app: &Router) -> i64 {
    let (status, body) = send(app, "POST", "/templates", Some(template_body())).await;
    assert_eq!(status, HttpStatusCode::CREATED);
    body["template"]["template_id"].as_i64().unwrap()
}

async fn generate_january_and_february(app: &Router, template_id: i64) -> Value {
    let (status, body) = send(
        app,
        "POST",
        &format!("/templates/{template_id}/generate"),
        Some(json!({ "from": "2025-01-01", "to": "2025-03-01" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    body
}

async fn create_pilot(app: &Router, name: &str, email: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/pilots",
        Some(json!({ "name": name, "email": email, "roles": ["pilot"] })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CREATED);
    body["pilot"]["pilot_id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_create_template_returns_created() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) = send(&app, "POST", "/templates", Some(template_body())).await;

    assert_eq!(status, HttpStatusCode::CREATED);
    assert_eq!(body["template"]["name"], "Solar farm thermal inspection");
    assert_eq!(body["template"]["is_active"], true);
}

#[tokio::test]
async fn test_create_template_with_bad_rule_is_bad_request() {
    let app: Router = build_router(create_test_app_state());
    let mut body = template_body();
    body["rrule"] = json!("FREQ=FORTNIGHTLY");

    let (status, body) = send(&app, "POST", "/templates", Some(body)).await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("rrule"));
}

#[tokio::test]
async fn test_unknown_template_is_not_found() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) = send(&app, "GET", "/templates/999", None).await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_generate_is_idempotent_over_http() {
    let app: Router = build_router(create_test_app_state());
    let template_id = create_template(&app).await;

    let first = generate_january_and_february(&app, template_id).await;
    assert_eq!(first["generated"], 8);
    assert_eq!(first["skipped"], 0);

    let second = generate_january_and_february(&app, template_id).await;
    assert_eq!(second["generated"], 0);
    assert_eq!(second["skipped"], 8);

    let (status, listed) = send(
        &app,
        "GET",
        &format!("/templates/{template_id}/occurrences?from=2025-02-01&to=2025-02-28"),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(listed["occurrences"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_delete_with_promoted_occurrence_is_conflict() {
    let app: Router = build_router(create_test_app_state());
    let template_id = create_template(&app).await;
    let generated = generate_january_and_february(&app, template_id).await;
    let occurrence_id = generated["occurrences"][0]["occurrence_id"].as_i64().unwrap();

    let (status, promoted) = send(
        &app,
        "POST",
        &format!("/occurrences/{occurrence_id}/promote"),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert!(promoted["job_id"].as_i64().unwrap() > 0);

    let (status, body) = send(&app, "DELETE", &format!("/templates/{template_id}"), None).await;
    assert_eq!(status, HttpStatusCode::CONFLICT);
    assert_eq!(body["error"], true);

    let (status, _) = send(&app, "GET", &format!("/templates/{template_id}"), None).await;
    assert_eq!(status, HttpStatusCode::OK);
}

#[tokio::test]
async fn test_preview_and_validate() {
    let app: Router = build_router(create_test_app_state());

    let (status, preview) = send(
        &app,
        "POST",
        "/recurrence/preview",
        Some(json!({
            "rrule": "FREQ=MONTHLY;BYMONTHDAY=15",
            "dtstart": "2025-01-01T10:00:00Z",
            "count": 3
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let instants = preview["occurrences"].as_array().unwrap();
    assert_eq!(instants.len(), 3);
    assert_eq!(instants[0], "2025-01-15T10:00:00Z");

    let (status, validation) = send(
        &app,
        "POST",
        "/recurrence/validate",
        Some(json!({ "rrule": "FREQ=DAILY;INTERVAL=0" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(validation["valid"], false);
    assert!(validation["error"].is_string());
}

#[tokio::test]
async fn test_conflict_queries_for_pilot_with_blackout() {
    let app: Router = build_router(create_test_app_state());
    let pilot_id = create_pilot(&app, "Ada Okafor", "ada@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/pilots/{pilot_id}/blackouts"),
        Some(json!({ "start_date": "2025-03-10", "end_date": "2025-03-14", "reason": "Training" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CREATED);

    let (status, report) = send(
        &app,
        "GET",
        &format!("/pilots/{pilot_id}/conflicts?date=2025-03-12&duration_hours=3"),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(report["has_conflicts"], true);
    assert_eq!(report["can_schedule"], false);

    let (status, check) = send(
        &app,
        "GET",
        &format!("/pilots/{pilot_id}/can_assign?date=2025-03-17"),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(check["can_assign"], true);
}

#[tokio::test]
async fn test_invalid_conflict_date_is_bad_request() {
    let app: Router = build_router(create_test_app_state());
    let pilot_id = create_pilot(&app, "Ada Okafor", "ada@example.com").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/pilots/{pilot_id}/conflicts?date=next-tuesday"),
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("date"));
}

#[tokio::test]
async fn test_suggestions_rank_available_pilot_first() {
    let app: Router = build_router(create_test_app_state());
    let blocked = create_pilot(&app, "Blocked Pilot", "blocked@example.com").await;
    let free = create_pilot(&app, "Free Pilot", "free@example.com").await;
    send(
        &app,
        "POST",
        &format!("/pilots/{blocked}/blackouts"),
        Some(json!({ "start_date": "2025-04-01", "end_date": "2025-04-30" })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/suggestions?date=2025-04-09", None).await;

    assert_eq!(status, HttpStatusCode::OK);
    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0]["pilot_id"].as_i64().unwrap(), free);
    assert_eq!(suggestions[1]["pilot_id"].as_i64().unwrap(), blocked);
}

#[tokio::test]
async fn test_sweep_processes_active_templates() {
    let app: Router = build_router(create_test_app_state());
    create_template(&app).await;

    let (status, body) = send(&app, "POST", "/sweep", None).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["processed"], 1);
    assert!(body["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_job_schedule_and_assignment_flow() {
    let app: Router = build_router(create_test_app_state());
    let template_id = create_template(&app).await;
    let generated = generate_january_and_february(&app, template_id).await;
    let occurrence_id = generated["occurrences"][0]["occurrence_id"].as_i64().unwrap();
    let (_, promoted) = send(
        &app,
        "POST",
        &format!("/occurrences/{occurrence_id}/promote"),
        None,
    )
    .await;
    let job_id = promoted["job_id"].as_i64().unwrap();
    let pilot_id = create_pilot(&app, "Ada Okafor", "ada@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/jobs/{job_id}/assignments"),
        Some(json!({ "pilot_id": pilot_id })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("job_requires_schedule"));

    let (status, scheduled) = send(
        &app,
        "POST",
        &format!("/jobs/{job_id}/schedule"),
        Some(json!({ "date": "2025-01-08" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(scheduled["job"]["scheduled_date"], "2025-01-08");

    let (status, assigned) = send(
        &app,
        "POST",
        &format!("/jobs/{job_id}/assignments"),
        Some(json!({ "pilot_id": pilot_id, "duration_hours": 2.5 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(assigned["job"]["assigned_pilots"], json!([pilot_id]));

    let (status, fetched) = send(&app, "GET", &format!("/jobs/{job_id}"), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(fetched["job"]["metadata"]["source_occurrence_id"], occurrence_id);
}
