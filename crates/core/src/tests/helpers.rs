// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PilotStore, register_pilot};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use flightline_domain::{
    ClientRef, DEFAULT_WINDOW_DAYS, JobMetadata, NewJob, NewPilot, Pilot, PipelineStage,
    ProductLine, Role, TemplateDraft, WorkloadLimits,
};

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// "Every Monday" from 2025-01-06 09:00 UTC with the default window.
pub fn create_weekly_draft() -> TemplateDraft {
    TemplateDraft {
        name: String::from("Quarry stockpile survey"),
        is_manual: false,
        site_id: 21,
        client: ClientRef::organization(4),
        rrule: Some(String::from("FREQ=WEEKLY;BYDAY=MO")),
        timezone: String::from("UTC"),
        dtstart: Some(utc(2025, 1, 6, 9, 0)),
        dtend: None,
        window_days: DEFAULT_WINDOW_DAYS,
        payable_amount_cents: Some(32_500),
        notes: Some(String::from("Gate code 4471")),
        products: vec![ProductLine {
            product_id: 2,
            name: String::from("Volumetric report"),
            quantity: 1,
            unit_price_cents: 65_000,
        }],
        created_by: 1,
    }
}

pub fn create_manual_draft() -> TemplateDraft {
    TemplateDraft {
        name: String::from("Ad hoc roof inspection"),
        is_manual: true,
        rrule: None,
        dtstart: None,
        ..create_weekly_draft()
    }
}

pub fn create_test_job(name: &str) -> NewJob {
    NewJob {
        name: name.to_string(),
        site_id: 21,
        client: ClientRef::person(9),
        products: Vec::new(),
        date_history: Vec::new(),
        stage: PipelineStage::Scheduled,
        scheduled_date: None,
        metadata: JobMetadata::default(),
    }
}

pub fn create_test_pilot<S: PilotStore>(store: &mut S, name: &str, roles: &[Role]) -> Pilot {
    register_pilot(
        store,
        &NewPilot {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            roles: roles.to_vec(),
            limits: WorkloadLimits::unlimited(),
        },
    )
    .unwrap()
}
