// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::pilot::{NewPilot, PilotAvailability, PilotBlackout};
use crate::recurrence::{parse_rule, parse_timezone};
use crate::template::TemplateDraft;

/// Longest rolling generation window a template may declare.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Validates a template definition before it is saved.
///
/// This checks the draft in isolation. It does NOT check that the site or
/// client exist (that requires context).
///
/// # Arguments
///
/// * `draft` - The template definition to validate
///
/// # Errors
///
/// Returns an error if:
/// - The name is blank
/// - The window length is outside 1..=366 days
/// - The timezone is not a known IANA zone
/// - `dtend` precedes `dtstart`
/// - The payable amount is negative
/// - A product line has a zero quantity or negative price
/// - The template is not manual and its rule does not parse
pub fn validate_template(draft: &TemplateDraft) -> Result<(), DomainError> {
    if draft.name.trim().is_empty() {
        return Err(DomainError::InvalidTemplate {
            field: "name",
            reason: String::from("Name cannot be empty"),
        });
    }

    if !(1..=MAX_WINDOW_DAYS).contains(&draft.window_days) {
        return Err(DomainError::InvalidTemplate {
            field: "window_days",
            reason: format!(
                "Window must be between 1 and {MAX_WINDOW_DAYS} days, got {}",
                draft.window_days
            ),
        });
    }

    parse_timezone(&draft.timezone)?;

    if let (Some(start), Some(end)) = (draft.dtstart, draft.dtend) {
        if end < start {
            return Err(DomainError::InvalidTemplate {
                field: "dtend",
                reason: format!("dtend {end} is before dtstart {start}"),
            });
        }
    }

    if draft.payable_amount_cents.is_some_and(|cents| cents < 0) {
        return Err(DomainError::InvalidTemplate {
            field: "payable_amount_cents",
            reason: String::from("Payable amount cannot be negative"),
        });
    }

    for line in &draft.products {
        if line.quantity == 0 || line.unit_price_cents < 0 {
            return Err(DomainError::InvalidTemplate {
                field: "products",
                reason: format!(
                    "Product {} needs a positive quantity and a non-negative price",
                    line.product_id
                ),
            });
        }
    }

    // Manual templates keep whatever rule text they were given; it is never expanded.
    let expandable = draft
        .rrule
        .as_deref()
        .filter(|r| !draft.is_manual && !r.trim().is_empty());
    if let Some(rule) = expandable {
        parse_rule(rule)?;
    }

    Ok(())
}

/// Validates a pilot profile before it is saved.
///
/// # Errors
///
/// Returns an error if the name is blank, the email has no `@`, or a
/// workload limit is zero.
pub fn validate_pilot(pilot: &NewPilot) -> Result<(), DomainError> {
    if pilot.name.trim().is_empty() {
        return Err(DomainError::InvalidPilot {
            field: "name",
            reason: String::from("Name cannot be empty"),
        });
    }
    if !pilot.email.contains('@') {
        return Err(DomainError::InvalidPilot {
            field: "email",
            reason: format!("'{}' is not an email address", pilot.email),
        });
    }
    let limits = [
        pilot.limits.max_jobs_per_week,
        pilot.limits.max_jobs_per_month,
    ];
    if limits.contains(&Some(0)) {
        return Err(DomainError::InvalidPilot {
            field: "limits",
            reason: String::from("Workload limits must be at least 1 when set"),
        });
    }
    Ok(())
}

/// Validates a blackout range.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if the range ends before it starts.
pub fn validate_blackout(blackout: &PilotBlackout) -> Result<(), DomainError> {
    if blackout.end_date < blackout.start_date {
        return Err(DomainError::InvalidDateRange {
            start: blackout.start_date,
            end: blackout.end_date,
        });
    }
    Ok(())
}

/// Validates one weekly availability row.
///
/// A time window is optional, but when both ends are present the end must
/// come after the start.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimeWindow` for an empty or inverted window.
pub fn validate_availability(row: &PilotAvailability) -> Result<(), DomainError> {
    match (row.start_time, row.end_time) {
        (Some(start), Some(end)) if end <= start => {
            Err(DomainError::InvalidTimeWindow { start, end })
        }
        _ => Ok(()),
    }
}
