// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_manual_draft, create_weekly_draft, utc};
use super::memory_store::InMemoryStore;
use crate::{
    FixedClock, JobStore, OccurrenceStore, SweepCoordinator, SweepResult, TemplateStore,
    promote_occurrence,
};
use chrono::TimeDelta;
use flightline_domain::{OccurrenceStatus, TemplateDraft};

#[test]
fn test_two_sweeps_generate_then_promote() {
    let mut store = InMemoryStore::new();
    let template_id = store.seed_template(create_weekly_draft());
    let clock = FixedClock::new(utc(2025, 1, 1, 0, 0));
    let sweeper = SweepCoordinator::new(&clock);

    let first: SweepResult = sweeper.sweep(&mut store).unwrap();
    assert_eq!(first.processed, 1);
    assert_eq!(first.total_occurrences, 8);
    assert_eq!(first.total_jobs, 0);
    assert!(first.errors.is_empty());

    clock.advance(TimeDelta::days(13));
    let second = sweeper.sweep(&mut store).unwrap();

    // March 3 and 10 enter the window; January 6 and 13 fall due.
    assert_eq!(second.total_occurrences, 2);
    assert_eq!(second.total_jobs, 2);
    assert_eq!(store.job_count(), 2);
    assert_eq!(store.occurrence_count(template_id), 10);

    let created: Vec<_> = store
        .list_occurrences(template_id, None, None)
        .unwrap()
        .into_iter()
        .filter(|o| o.status == OccurrenceStatus::Created)
        .map(|o| o.occurs_at)
        .collect();
    assert_eq!(created, vec![utc(2025, 1, 6, 9, 0), utc(2025, 1, 13, 9, 0)]);
}

#[test]
fn test_repeated_sweep_is_quiet() {
    let mut store = InMemoryStore::new();
    store.seed_template(create_weekly_draft());
    let clock = FixedClock::new(utc(2025, 1, 14, 0, 0));
    let sweeper = SweepCoordinator::new(&clock);

    sweeper.sweep(&mut store).unwrap();
    let again = sweeper.sweep(&mut store).unwrap();

    assert_eq!(again.processed, 1);
    assert_eq!(again.total_occurrences, 0);
    assert_eq!(again.total_jobs, 0);
}

#[test]
fn test_failing_template_does_not_stop_sweep() {
    let mut store = InMemoryStore::new();
    let broken = store.seed_template(TemplateDraft {
        rrule: Some(String::from("FREQ=FORTNIGHTLY")),
        ..create_weekly_draft()
    });
    let healthy = store.seed_template(create_weekly_draft());
    let clock = FixedClock::new(utc(2025, 1, 1, 0, 0));

    let result = SweepCoordinator::new(&clock).sweep(&mut store).unwrap();

    assert_eq!(result.processed, 1);
    assert_eq!(result.total_occurrences, 8);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].template_id, broken);
    assert!(result.errors[0].message.contains("FORTNIGHTLY"));
    assert_eq!(store.occurrence_count(healthy), 8);
}

#[test]
fn test_manual_and_inactive_templates_are_skipped() {
    let mut store = InMemoryStore::new();
    let manual = store.seed_template(create_manual_draft());
    let inactive = store.seed_template(create_weekly_draft());
    store.set_template_active(inactive, false).unwrap();
    let clock = FixedClock::new(utc(2025, 1, 14, 0, 0));

    let result = SweepCoordinator::new(&clock).sweep(&mut store).unwrap();

    assert_eq!(result, SweepResult::default());
    assert_eq!(store.occurrence_count(manual), 0);
    assert_eq!(store.occurrence_count(inactive), 0);
}

#[test]
fn test_sweep_skips_occurrences_already_promoted() {
    let mut store = InMemoryStore::new();
    let template_id = store.seed_template(create_weekly_draft());
    let clock = FixedClock::new(utc(2025, 1, 1, 0, 0));
    let sweeper = SweepCoordinator::new(&clock);
    sweeper.sweep(&mut store).unwrap();

    let first = store.list_occurrences(template_id, None, None).unwrap()[0].clone();
    let job_id = promote_occurrence(&mut store, first.occurrence_id).unwrap();
    clock.set(utc(2025, 1, 7, 0, 0));

    let result = sweeper.sweep(&mut store).unwrap();

    assert_eq!(result.total_jobs, 0);
    assert_eq!(store.job_count(), 1);
    assert!(store.get_job(job_id).unwrap().is_some());
}

#[test]
fn test_max_count_caps_each_template() {
    let mut store = InMemoryStore::new();
    let template_id = store.seed_template(create_weekly_draft());
    let clock = FixedClock::new(utc(2025, 1, 1, 0, 0));

    let result = SweepCoordinator::with_max_count(&clock, 3)
        .sweep(&mut store)
        .unwrap();

    assert_eq!(result.total_occurrences, 3);
    assert_eq!(
        store.get_template(template_id).unwrap().unwrap().last_generated_through,
        Some(utc(2025, 1, 20, 9, 0))
    );
}
