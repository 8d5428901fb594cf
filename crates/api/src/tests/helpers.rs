// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use chrono::{DateTime, TimeZone, Utc};
use flightline::FixedClock;
use flightline_persistence::Persistence;

use crate::{CreatePilotRequest, PilotResponse, TemplateRequest, TemplateResponse};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .unwrap()
}

/// A clock parked the evening before the first Monday of 2025.
pub fn create_test_clock() -> FixedClock {
    FixedClock::new(utc(2025, 1, 5, 18))
}

/// "Every Monday at 09:00 UTC" from 2025-01-06.
pub fn create_valid_template_request() -> TemplateRequest {
    TemplateRequest {
        name: String::from("Quarry stockpile survey"),
        is_manual: false,
        site_id: 21,
        client_type: String::from("organization"),
        client_id: 5,
        rrule: Some(String::from("FREQ=WEEKLY;BYDAY=MO")),
        timezone: String::from("UTC"),
        dtstart: Some(String::from("2025-01-06T09:00:00Z")),
        dtend: None,
        window_days: None,
        payable_amount_cents: Some(25_000),
        notes: None,
        products: Vec::new(),
        created_by: 1,
    }
}

pub fn create_test_template(persistence: &mut Persistence) -> TemplateResponse {
    crate::create_template(persistence, &create_valid_template_request()).unwrap()
}

pub fn create_pilot_request(name: &str, roles: &[&str]) -> CreatePilotRequest {
    CreatePilotRequest {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        roles: roles.iter().map(|r| (*r).to_string()).collect(),
        max_jobs_per_week: None,
        max_jobs_per_month: None,
    }
}

pub fn create_test_pilot(persistence: &mut Persistence, name: &str) -> PilotResponse {
    crate::register_pilot(persistence, &create_pilot_request(name, &["pilot"])).unwrap()
}
