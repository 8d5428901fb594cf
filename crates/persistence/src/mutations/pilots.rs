// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use flightline_domain::{DateWindow, NewPilot, PilotAvailability, Role, weekday_index};
use std::collections::BTreeSet;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{encode_date, encode_flag, encode_time};
use crate::diesel_schema::{pilot_availability, pilot_blackouts, user_roles, users};
use crate::error::PersistenceError;

fn encode_limit(value: Option<u32>) -> Result<Option<i32>, PersistenceError> {
    value
        .map(|v| {
            i32::try_from(v)
                .map_err(|e| PersistenceError::Other(format!("workload limit out of range: {e}")))
        })
        .transpose()
}

/// Inserts a user and their role set.
///
/// # Returns
///
/// The new user ID.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the email is taken, or
/// another error if a statement fails.
pub fn insert_pilot(
    conn: &mut SqliteConnection,
    pilot: &NewPilot,
) -> Result<i64, PersistenceError> {
    let week = encode_limit(pilot.limits.max_jobs_per_week)?;
    let month = encode_limit(pilot.limits.max_jobs_per_month)?;
    let roles: BTreeSet<&'static str> = pilot.roles.iter().map(Role::as_str).collect();

    conn.transaction(|conn| {
        diesel::insert_into(users::table)
            .values((
                users::name.eq(&pilot.name),
                users::email.eq(&pilot.email),
                users::max_jobs_per_week.eq(week),
                users::max_jobs_per_month.eq(month),
            ))
            .execute(conn)?;
        let user_id: i64 = conn.get_last_insert_rowid()?;

        for role in &roles {
            diesel::insert_into(user_roles::table)
                .values((user_roles::user_id.eq(user_id), user_roles::role.eq(*role)))
                .execute(conn)?;
        }

        info!(user_id, roles = roles.len(), "Inserted user");
        Ok(user_id)
    })
}

/// Replaces all availability rows for a pilot.
///
/// # Errors
///
/// Returns an error if a statement fails; no rows change in that case.
pub fn replace_availability(
    conn: &mut SqliteConnection,
    pilot_id: i64,
    rows: &[PilotAvailability],
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        diesel::delete(pilot_availability::table.filter(pilot_availability::pilot_id.eq(pilot_id)))
            .execute(conn)?;

        for row in rows {
            diesel::insert_into(pilot_availability::table)
                .values((
                    pilot_availability::pilot_id.eq(pilot_id),
                    pilot_availability::weekday.eq(weekday_index(row.weekday)),
                    pilot_availability::is_available.eq(encode_flag(row.is_available)),
                    pilot_availability::start_time.eq(row.start_time.map(encode_time)),
                    pilot_availability::end_time.eq(row.end_time.map(encode_time)),
                ))
                .execute(conn)?;
        }
        Ok(())
    })
}

/// # Returns
///
/// The new blackout ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_blackout(
    conn: &mut SqliteConnection,
    pilot_id: i64,
    window: DateWindow,
    reason: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(pilot_blackouts::table)
        .values((
            pilot_blackouts::pilot_id.eq(pilot_id),
            pilot_blackouts::start_date.eq(encode_date(window.start)),
            pilot_blackouts::end_date.eq(encode_date(window.end)),
            pilot_blackouts::reason.eq(reason),
        ))
        .execute(conn)?;

    conn.get_last_insert_rowid()
}
