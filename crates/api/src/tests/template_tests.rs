// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_test_clock, create_test_persistence, create_test_template,
    create_valid_template_request, utc,
};
use crate::{
    ApiError, DEFAULT_PREVIEW_COUNT, GenerateOccurrencesRequest, ListOccurrencesQuery,
    PreviewRequest, SetOccurrenceStatusRequest, SetTemplateActiveRequest, TemplateRequest,
    ValidateRuleRequest, create_template, delete_template, generate_occurrences, get_template,
    list_occurrences, preview, promote_occurrence, set_occurrence_status, set_template_active,
    sweep, update_template, validate,
};
use flightline_domain::{ClientType, OccurrenceStatus};

fn q1_request() -> GenerateOccurrencesRequest {
    GenerateOccurrencesRequest {
        from: Some(String::from("2025-01-01")),
        to: Some(String::from("2025-03-01")),
        max_count: None,
    }
}

fn assert_invalid_field(result: Result<impl std::fmt::Debug, ApiError>, expected: &str) {
    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected invalid input on '{expected}', got {other:?}"),
    }
}

#[test]
fn test_create_template_parses_fields() {
    let mut persistence = create_test_persistence();

    let response = create_test_template(&mut persistence);

    assert_eq!(response.message, "Created template 'Quarry stockpile survey'");
    let template = response.template;
    assert!(template.is_active);
    assert_eq!(template.last_generated_through, None);
    assert_eq!(template.draft.client.client_type, ClientType::Organization);
    assert_eq!(template.draft.dtstart, Some(utc(2025, 1, 6, 9)));
    assert_eq!(template.draft.window_days, 60);
}

#[test]
fn test_create_template_rejects_bad_rule_at_save_time() {
    let mut persistence = create_test_persistence();
    let request = TemplateRequest {
        rrule: Some(String::from("FREQ=FORTNIGHTLY")),
        ..create_valid_template_request()
    };

    let result = create_template(&mut persistence, &request);

    match result {
        Err(ApiError::InvalidInput { field, message }) => {
            assert_eq!(field, "rrule");
            assert!(message.contains("FORTNIGHTLY"));
        }
        other => panic!("expected invalid rule, got {other:?}"),
    }
}

#[test]
fn test_create_template_rejects_unparsable_fields() {
    let mut persistence = create_test_persistence();

    assert_invalid_field(
        create_template(
            &mut persistence,
            &TemplateRequest {
                client_type: String::from("company"),
                ..create_valid_template_request()
            },
        ),
        "client_type",
    );
    assert_invalid_field(
        create_template(
            &mut persistence,
            &TemplateRequest {
                dtstart: Some(String::from("Monday morning")),
                ..create_valid_template_request()
            },
        ),
        "dtstart",
    );
    assert_invalid_field(
        create_template(
            &mut persistence,
            &TemplateRequest {
                timezone: String::from("Mars/Olympus_Mons"),
                ..create_valid_template_request()
            },
        ),
        "timezone",
    );
}

#[test]
fn test_unknown_template_is_not_found() {
    let mut persistence = create_test_persistence();

    let result = get_template(&mut persistence, 404);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_generate_is_idempotent_over_same_window() {
    let mut persistence = create_test_persistence();
    let template_id = create_test_template(&mut persistence).template.template_id;

    let first = generate_occurrences(
        &mut persistence,
        create_test_clock(),
        template_id,
        &q1_request(),
        100,
    )
    .unwrap();
    let second = generate_occurrences(
        &mut persistence,
        create_test_clock(),
        template_id,
        &q1_request(),
        100,
    )
    .unwrap();

    assert_eq!((first.generated, first.skipped), (8, 0));
    assert_eq!((second.generated, second.skipped), (0, 8));
    assert!(second.occurrences.is_empty());
}

#[test]
fn test_generate_respects_requested_cap() {
    let mut persistence = create_test_persistence();
    let template_id = create_test_template(&mut persistence).template.template_id;
    let request = GenerateOccurrencesRequest {
        max_count: Some(3),
        ..q1_request()
    };

    let response =
        generate_occurrences(&mut persistence, create_test_clock(), template_id, &request, 100)
            .unwrap();

    assert_eq!(response.generated, 3);
    assert_eq!(response.occurrences[2].occurs_at, utc(2025, 1, 20, 9));
}

#[test]
fn test_generate_rejects_zero_cap() {
    let mut persistence = create_test_persistence();
    let template_id = create_test_template(&mut persistence).template.template_id;
    let request = GenerateOccurrencesRequest {
        max_count: Some(0),
        ..q1_request()
    };

    assert_invalid_field(
        generate_occurrences(&mut persistence, create_test_clock(), template_id, &request, 100),
        "max_count",
    );
}

#[test]
fn test_list_occurrences_filters_by_bounds() {
    let mut persistence = create_test_persistence();
    let template_id = create_test_template(&mut persistence).template.template_id;
    generate_occurrences(
        &mut persistence,
        create_test_clock(),
        template_id,
        &q1_request(),
        100,
    )
    .unwrap();

    let february = list_occurrences(
        &mut persistence,
        template_id,
        &ListOccurrencesQuery {
            from: Some(String::from("2025-02-01")),
            to: Some(String::from("2025-02-28T23:59:59Z")),
        },
    )
    .unwrap();

    assert_eq!(february.occurrences.len(), 4);
    assert_eq!(february.occurrences[0].occurs_at, utc(2025, 2, 3, 9));
}

#[test]
fn test_promote_twice_returns_same_job() {
    let mut persistence = create_test_persistence();
    let template_id = create_test_template(&mut persistence).template.template_id;
    let generated = generate_occurrences(
        &mut persistence,
        create_test_clock(),
        template_id,
        &q1_request(),
        100,
    )
    .unwrap();
    let occurrence_id = generated.occurrences[0].occurrence_id;

    let first = promote_occurrence(&mut persistence, occurrence_id).unwrap();
    let second = promote_occurrence(&mut persistence, occurrence_id).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.occurrence_id, occurrence_id);
}

#[test]
fn test_status_change_after_promotion_is_a_conflict() {
    let mut persistence = create_test_persistence();
    let template_id = create_test_template(&mut persistence).template.template_id;
    let generated = generate_occurrences(
        &mut persistence,
        create_test_clock(),
        template_id,
        &q1_request(),
        100,
    )
    .unwrap();
    let promoted = generated.occurrences[0].occurrence_id;
    let other = generated.occurrences[1].occurrence_id;
    promote_occurrence(&mut persistence, promoted).unwrap();

    let skipped = set_occurrence_status(
        &mut persistence,
        other,
        &SetOccurrenceStatusRequest {
            status: String::from("skipped"),
        },
    )
    .unwrap();
    let blocked = set_occurrence_status(
        &mut persistence,
        promoted,
        &SetOccurrenceStatusRequest {
            status: String::from("cancelled"),
        },
    );

    assert_eq!(skipped.occurrence.status, OccurrenceStatus::Skipped);
    assert!(matches!(blocked, Err(ApiError::DomainRuleViolation { .. })));
    assert_invalid_field(
        set_occurrence_status(
            &mut persistence,
            other,
            &SetOccurrenceStatusRequest {
                status: String::from("postponed"),
            },
        ),
        "status",
    );
}

#[test]
fn test_delete_is_refused_once_jobs_exist() {
    let mut persistence = create_test_persistence();
    let template_id = create_test_template(&mut persistence).template.template_id;
    let generated = generate_occurrences(
        &mut persistence,
        create_test_clock(),
        template_id,
        &q1_request(),
        100,
    )
    .unwrap();
    for occurrence in generated.occurrences.iter().take(2) {
        promote_occurrence(&mut persistence, occurrence.occurrence_id).unwrap();
    }

    let result = delete_template(&mut persistence, template_id);

    match result {
        Err(ApiError::DomainRuleViolation { rule, message }) => {
            assert_eq!(rule, "template_has_materialized_jobs");
            assert!(message.contains("2 occurrence(s)"));
        }
        other => panic!("expected deletion guard, got {other:?}"),
    }
}

#[test]
fn test_delete_then_fetch_is_not_found() {
    let mut persistence = create_test_persistence();
    let template_id = create_test_template(&mut persistence).template.template_id;

    let response = delete_template(&mut persistence, template_id).unwrap();

    assert_eq!(response.template_id, template_id);
    assert!(matches!(
        get_template(&mut persistence, template_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_update_keeps_watermark_and_deactivation_stops_sweep() {
    let mut persistence = create_test_persistence();
    let template_id = create_test_template(&mut persistence).template.template_id;
    generate_occurrences(
        &mut persistence,
        create_test_clock(),
        template_id,
        &q1_request(),
        100,
    )
    .unwrap();

    let updated = update_template(
        &mut persistence,
        template_id,
        &TemplateRequest {
            name: String::from("Quarry stockpile survey (north pit)"),
            ..create_valid_template_request()
        },
    )
    .unwrap();
    assert_eq!(updated.template.last_generated_through, Some(utc(2025, 2, 24, 9)));

    let deactivated = set_template_active(
        &mut persistence,
        template_id,
        SetTemplateActiveRequest { is_active: false },
    )
    .unwrap();
    assert!(!deactivated.template.is_active);
    assert!(deactivated.message.starts_with("Deactivated"));

    let result = sweep(&mut persistence, create_test_clock(), 100).unwrap();
    assert_eq!(result.processed, 0);
}

#[test]
fn test_preview_lists_instants_without_storing() {
    let response = preview(&PreviewRequest {
        rrule: String::from("FREQ=DAILY;INTERVAL=2"),
        timezone: String::from("UTC"),
        dtstart: String::from("2025-01-01T08:00:00Z"),
        count: Some(3),
    })
    .unwrap();

    assert_eq!(
        response.occurrences,
        vec![utc(2025, 1, 1, 8), utc(2025, 1, 3, 8), utc(2025, 1, 5, 8)]
    );
}

#[test]
fn test_preview_of_bad_rule_is_empty() {
    let response = preview(&PreviewRequest {
        rrule: String::from("not a rule"),
        timezone: String::from("UTC"),
        dtstart: String::from("2025-01-01"),
        count: None,
    })
    .unwrap();

    assert!(response.occurrences.is_empty());
    assert_eq!(DEFAULT_PREVIEW_COUNT, 10);
}

#[test]
fn test_validate_reports_reason() {
    let good = validate(&ValidateRuleRequest {
        rrule: String::from("FREQ=MONTHLY;BYMONTHDAY=1"),
    });
    let bad = validate(&ValidateRuleRequest {
        rrule: String::from("FREQ=MONTHLY;BYMONTHDAY=40"),
    });

    assert!(good.valid);
    assert_eq!(good.error, None);
    assert!(!bad.valid);
    assert!(bad.error.is_some());
}
