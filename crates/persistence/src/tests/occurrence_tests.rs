// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_persistence, insert_test_job, insert_weekly_template, utc};
use flightline::{InsertOutcome, LinkOutcome, OccurrenceStore};
use flightline_domain::OccurrenceStatus;

#[test]
fn test_duplicate_instant_reports_already_exists() {
    let mut persistence = create_test_persistence();
    let template_id = insert_weekly_template(&mut persistence).template_id;

    let first = persistence
        .insert_occurrence(template_id, utc(2025, 1, 6, 9, 0))
        .unwrap();
    let second = persistence
        .insert_occurrence(template_id, utc(2025, 1, 6, 9, 0))
        .unwrap();

    assert!(matches!(first, InsertOutcome::Inserted(_)));
    assert_eq!(second, InsertOutcome::AlreadyExists);
    assert_eq!(
        persistence
            .list_occurrences(template_id, None, None)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_same_instant_on_two_templates_is_allowed() {
    let mut persistence = create_test_persistence();
    let first = insert_weekly_template(&mut persistence).template_id;
    let second = insert_weekly_template(&mut persistence).template_id;

    let a = persistence
        .insert_occurrence(first, utc(2025, 1, 6, 9, 0))
        .unwrap();
    let b = persistence
        .insert_occurrence(second, utc(2025, 1, 6, 9, 0))
        .unwrap();

    assert!(matches!(a, InsertOutcome::Inserted(_)));
    assert!(matches!(b, InsertOutcome::Inserted(_)));
}

#[test]
fn test_range_query_is_inclusive_and_ordered() {
    let mut persistence = create_test_persistence();
    let template_id = insert_weekly_template(&mut persistence).template_id;
    for day in [20, 6, 13, 27] {
        persistence
            .insert_occurrence(template_id, utc(2025, 1, day, 9, 0))
            .unwrap();
    }

    let found = persistence
        .list_occurrences(
            template_id,
            Some(utc(2025, 1, 13, 9, 0)),
            Some(utc(2025, 1, 20, 9, 0)),
        )
        .unwrap();

    let instants: Vec<_> = found.iter().map(|o| o.occurs_at).collect();
    assert_eq!(instants, vec![utc(2025, 1, 13, 9, 0), utc(2025, 1, 20, 9, 0)]);
    assert!(found.iter().all(|o| o.status == OccurrenceStatus::Planned));
}

#[test]
fn test_due_list_only_has_past_planned_occurrences() {
    let mut persistence = create_test_persistence();
    let template_id = insert_weekly_template(&mut persistence).template_id;
    let mut ids = Vec::new();
    for day in [6, 13, 20] {
        let InsertOutcome::Inserted(id) = persistence
            .insert_occurrence(template_id, utc(2025, 1, day, 9, 0))
            .unwrap()
        else {
            panic!("expected insert");
        };
        ids.push(id);
    }
    persistence
        .set_occurrence_status(ids[0], OccurrenceStatus::Skipped)
        .unwrap();

    let due = persistence
        .list_due_occurrences(template_id, utc(2025, 1, 13, 9, 0))
        .unwrap();

    assert_eq!(due.len(), 1);
    assert_eq!(due[0].occurrence_id, ids[1]);
}

#[test]
fn test_link_happens_once() {
    let mut persistence = create_test_persistence();
    let template_id = insert_weekly_template(&mut persistence).template_id;
    let InsertOutcome::Inserted(occurrence_id) = persistence
        .insert_occurrence(template_id, utc(2025, 1, 6, 9, 0))
        .unwrap()
    else {
        panic!("expected insert");
    };
    let winner = insert_test_job(&mut persistence, "Winner");
    let loser = insert_test_job(&mut persistence, "Loser");

    let first = persistence
        .mark_occurrence_created(occurrence_id, winner)
        .unwrap();
    let second = persistence
        .mark_occurrence_created(occurrence_id, loser)
        .unwrap();

    assert_eq!(first, LinkOutcome::Linked);
    assert_eq!(second, LinkOutcome::AlreadyLinked(winner));
    assert_eq!(persistence.count_created_occurrences(template_id).unwrap(), 1);

    let occurrence = persistence.get_occurrence(occurrence_id).unwrap().unwrap();
    assert_eq!(occurrence.status, OccurrenceStatus::Created);
    assert_eq!(occurrence.job_id, Some(winner));

    // A created occurrence no longer accepts status changes.
    assert!(
        !persistence
            .set_occurrence_status(occurrence_id, OccurrenceStatus::Cancelled)
            .unwrap()
    );
}

#[test]
fn test_linking_unknown_occurrence_fails() {
    let mut persistence = create_test_persistence();
    let job_id = insert_test_job(&mut persistence, "Orphan");

    assert!(persistence.mark_occurrence_created(404, job_id).is_err());
}
