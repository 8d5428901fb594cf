// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod occurrence_tests;

use crate::Persistence;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use flightline::{InsertOutcome, JobStore, PilotStore, TemplateStore};
use flightline_domain::{
    ClientRef, DEFAULT_WINDOW_DAYS, JobMetadata, NewJob, NewPilot, Pilot, PipelineStage,
    ProductLine, RecurringJobTemplate, Role, TemplateDraft, WorkloadLimits,
};

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// "Every Monday" from 2025-01-06 09:00 UTC.
pub fn create_weekly_draft() -> TemplateDraft {
    TemplateDraft {
        name: String::from("Reservoir dam inspection"),
        is_manual: false,
        site_id: 7,
        client: ClientRef::organization(3),
        rrule: Some(String::from("FREQ=WEEKLY;BYDAY=MO")),
        timezone: String::from("UTC"),
        dtstart: Some(utc(2025, 1, 6, 9, 0)),
        dtend: None,
        window_days: DEFAULT_WINDOW_DAYS,
        payable_amount_cents: Some(41_000),
        notes: Some(String::from("Check in at the east gate")),
        products: vec![ProductLine {
            product_id: 11,
            name: String::from("Orthomosaic"),
            quantity: 2,
            unit_price_cents: 18_500,
        }],
        created_by: 1,
    }
}

pub fn insert_weekly_template(persistence: &mut Persistence) -> RecurringJobTemplate {
    persistence.insert_template(&create_weekly_draft()).unwrap()
}

pub fn create_test_job(name: &str) -> NewJob {
    NewJob {
        name: name.to_string(),
        site_id: 7,
        client: ClientRef::person(12),
        products: Vec::new(),
        date_history: Vec::new(),
        stage: PipelineStage::Intake,
        scheduled_date: None,
        metadata: JobMetadata::default(),
    }
}

pub fn insert_test_job(persistence: &mut Persistence, name: &str) -> i64 {
    match persistence.insert_job(&create_test_job(name)).unwrap() {
        InsertOutcome::Inserted(job_id) => job_id,
        InsertOutcome::AlreadyExists => panic!("unexpected duplicate job"),
    }
}

pub fn insert_test_pilot(persistence: &mut Persistence, name: &str, roles: &[Role]) -> Pilot {
    persistence
        .insert_pilot(&NewPilot {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            roles: roles.to_vec(),
            limits: WorkloadLimits::unlimited(),
        })
        .unwrap()
}
