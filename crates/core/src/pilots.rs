// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::store::PilotStore;
use flightline_domain::{
    DateWindow, DomainError, NewPilot, Pilot, PilotAvailability, PilotBlackout,
    validate_availability, validate_pilot,
};
use std::collections::HashSet;
use tracing::info;

/// # Errors
///
/// Returns an error if the profile fails validation or the store fails.
pub fn register_pilot<S>(store: &mut S, pilot: &NewPilot) -> Result<Pilot, CoreError>
where
    S: PilotStore + ?Sized,
{
    validate_pilot(pilot)?;
    let stored: Pilot = store.insert_pilot(pilot)?;
    info!(pilot_id = stored.pilot_id, "Registered pilot");
    Ok(stored)
}

/// # Errors
///
/// Returns an error if the pilot does not exist or the store fails.
pub fn get_pilot<S>(store: &mut S, pilot_id: i64) -> Result<Pilot, CoreError>
where
    S: PilotStore + ?Sized,
{
    store
        .get_pilot(pilot_id)?
        .ok_or(CoreError::PilotNotFound(pilot_id))
}

/// Replaces a pilot's weekly pattern.
///
/// Every row is re-owned by `pilot_id`. A weekday may appear at most once.
///
/// # Errors
///
/// Returns an error if the pilot does not exist, a row has an inverted time
/// window, a weekday repeats, or the store fails.
pub fn set_availability<S>(
    store: &mut S,
    pilot_id: i64,
    rows: &[PilotAvailability],
) -> Result<Vec<PilotAvailability>, CoreError>
where
    S: PilotStore + ?Sized,
{
    get_pilot(store, pilot_id)?;

    let mut seen = HashSet::new();
    let mut owned: Vec<PilotAvailability> = Vec::with_capacity(rows.len());
    for row in rows {
        validate_availability(row)?;
        if !seen.insert(row.weekday) {
            return Err(CoreError::DomainViolation(DomainError::InvalidPilot {
                field: "availability",
                reason: format!("{} appears more than once", row.weekday),
            }));
        }
        owned.push(PilotAvailability {
            pilot_id,
            ..row.clone()
        });
    }

    store.replace_availability(pilot_id, &owned)?;
    info!(pilot_id, rows = owned.len(), "Replaced pilot availability");
    Ok(owned)
}

/// # Errors
///
/// Returns an error if the pilot does not exist or the store fails.
pub fn add_blackout<S>(
    store: &mut S,
    pilot_id: i64,
    window: DateWindow,
    reason: Option<&str>,
) -> Result<PilotBlackout, CoreError>
where
    S: PilotStore + ?Sized,
{
    get_pilot(store, pilot_id)?;
    let blackout: PilotBlackout = store.insert_blackout(pilot_id, window, reason)?;
    info!(
        pilot_id,
        blackout_id = blackout.blackout_id,
        start = %window.start,
        end = %window.end,
        "Added pilot blackout"
    );
    Ok(blackout)
}
