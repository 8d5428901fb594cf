// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_job, create_test_pilot, date};
use super::memory_store::InMemoryStore;
use crate::{
    AssignmentCheck, CoreError, add_blackout, can_assign_pilot, detect_conflicts,
    register_pilot, set_availability,
};
use chrono::Weekday;
use flightline_domain::{
    ConflictDetails, ConflictReport, ConflictType, DateWindow, NewPilot, PilotAvailability, Role,
    Severity, WorkloadLimits,
};

fn weekday_row(weekday: Weekday) -> PilotAvailability {
    PilotAvailability {
        pilot_id: 0,
        weekday,
        is_available: true,
        start_time: None,
        end_time: None,
    }
}

#[test]
fn test_unconfigured_pilot_is_permissive_any_day() {
    let mut store = InMemoryStore::new();
    let pilot = create_test_pilot(&mut store, "Ana Reyes", &[Role::Pilot]);

    for day in 1..=7 {
        let report: ConflictReport =
            detect_conflicts(&mut store, pilot.pilot_id, date(2025, 2, day), 4.0).unwrap();
        assert!(!report.has_conflicts);
        assert!(report.can_schedule);
    }
}

#[test]
fn test_double_booking_references_job() {
    let mut store = InMemoryStore::new();
    let pilot = create_test_pilot(&mut store, "Ana Reyes", &[Role::Pilot]);
    store.seed_job(
        9,
        create_test_job("Quarry volumetrics"),
        date(2025, 2, 3),
        &[pilot.pilot_id],
    );

    let report = detect_conflicts(&mut store, pilot.pilot_id, date(2025, 2, 3), 4.0).unwrap();

    assert!(!report.can_schedule);
    let conflict = &report.conflicts[0];
    assert_eq!(conflict.conflict_type, ConflictType::DoubleBooking);
    assert_eq!(conflict.severity, Severity::Error);
    let Some(ConflictDetails::DoubleBooking { jobs }) = &conflict.details else {
        panic!("expected double booking details");
    };
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].job_id, 9);
}

#[test]
fn test_other_pilots_jobs_do_not_conflict() {
    let mut store = InMemoryStore::new();
    let pilot = create_test_pilot(&mut store, "Ana Reyes", &[Role::Pilot]);
    let other = create_test_pilot(&mut store, "Ben Okafor", &[Role::Pilot]);
    store.seed_job(
        9,
        create_test_job("Quarry volumetrics"),
        date(2025, 2, 3),
        &[other.pilot_id],
    );

    let report = detect_conflicts(&mut store, pilot.pilot_id, date(2025, 2, 3), 4.0).unwrap();
    assert!(!report.has_conflicts);
}

#[test]
fn test_configured_availability_blocks_other_weekdays() {
    let mut store = InMemoryStore::new();
    let pilot = create_test_pilot(&mut store, "Ana Reyes", &[Role::Pilot]);
    set_availability(
        &mut store,
        pilot.pilot_id,
        &[weekday_row(Weekday::Mon), weekday_row(Weekday::Wed)],
    )
    .unwrap();

    let monday = detect_conflicts(&mut store, pilot.pilot_id, date(2025, 2, 3), 4.0).unwrap();
    let tuesday = detect_conflicts(&mut store, pilot.pilot_id, date(2025, 2, 4), 4.0).unwrap();

    assert!(monday.can_schedule);
    assert!(!tuesday.can_schedule);
    assert_eq!(tuesday.conflicts[0].conflict_type, ConflictType::Availability);
}

#[test]
fn test_blackout_blocks_even_without_availability() {
    let mut store = InMemoryStore::new();
    let pilot = create_test_pilot(&mut store, "Ana Reyes", &[Role::Pilot]);
    add_blackout(
        &mut store,
        pilot.pilot_id,
        DateWindow::new(date(2025, 2, 1), date(2025, 2, 7)).unwrap(),
        Some("Annual leave"),
    )
    .unwrap();

    let check: AssignmentCheck =
        can_assign_pilot(&mut store, pilot.pilot_id, date(2025, 2, 3), 4.0).unwrap();

    assert!(!check.can_assign);
    assert!(check.reason.unwrap().contains("Annual leave"));

    let after = can_assign_pilot(&mut store, pilot.pilot_id, date(2025, 2, 8), 4.0).unwrap();
    assert!(after.can_assign);
    assert_eq!(after.reason, None);
}

#[test]
fn test_workload_limit_warns_without_blocking() {
    let mut store = InMemoryStore::new();
    let limited = register_pilot(
        &mut store,
        &NewPilot {
            name: String::from("Cara Lund"),
            email: String::from("cara@example.com"),
            roles: vec![Role::Staff],
            limits: WorkloadLimits {
                max_jobs_per_week: Some(1),
                max_jobs_per_month: None,
            },
        },
    )
    .unwrap();
    store.seed_job(32, create_test_job("Tower C"), date(2025, 2, 4), &[limited.pilot_id]);

    let report = detect_conflicts(&mut store, limited.pilot_id, date(2025, 2, 6), 4.0).unwrap();

    assert!(report.can_schedule);
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].conflict_type, ConflictType::WeeklyWorkload);
    assert_eq!(report.conflicts[0].severity, Severity::Warning);
}

#[test]
fn test_unknown_pilot_is_reported() {
    let mut store = InMemoryStore::new();

    let result = detect_conflicts(&mut store, 5, date(2025, 2, 3), 4.0);
    assert_eq!(result, Err(CoreError::PilotNotFound(5)));
}
