// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use flightline_domain::{
    DateWindow, Pilot, PilotAvailability, PilotBlackout, Role, WorkloadLimits, weekday_from_index,
};

use crate::data_models::{decode_date, decode_enum, decode_flag, decode_optional_time, encode_date};
use crate::diesel_schema::{pilot_availability, pilot_blackouts, user_roles, users};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct UserRow {
    user_id: i64,
    name: String,
    email: String,
    max_jobs_per_week: Option<i32>,
    max_jobs_per_month: Option<i32>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = pilot_availability)]
struct AvailabilityRow {
    pilot_id: i64,
    weekday: i32,
    is_available: i32,
    start_time: Option<String>,
    end_time: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = pilot_blackouts)]
struct BlackoutRow {
    blackout_id: i64,
    pilot_id: i64,
    start_date: String,
    end_date: String,
    reason: Option<String>,
}

fn decode_limit(value: Option<i32>, column: &'static str) -> Result<Option<u32>, PersistenceError> {
    value
        .map(|v| u32::try_from(v).map_err(|e| PersistenceError::malformed("users", column, e)))
        .transpose()
}

fn load_pilot(conn: &mut SqliteConnection, row: UserRow) -> Result<Pilot, PersistenceError> {
    let role_names: Vec<String> = user_roles::table
        .filter(user_roles::user_id.eq(row.user_id))
        .order(user_roles::role.asc())
        .select(user_roles::role)
        .load(conn)?;
    let roles: Vec<Role> = role_names
        .iter()
        .map(|r| decode_enum(r, "user_roles", "role"))
        .collect::<Result<_, _>>()?;

    Ok(Pilot {
        pilot_id: row.user_id,
        name: row.name,
        email: row.email,
        roles,
        limits: WorkloadLimits {
            max_jobs_per_week: decode_limit(row.max_jobs_per_week, "max_jobs_per_week")?,
            max_jobs_per_month: decode_limit(row.max_jobs_per_month, "max_jobs_per_month")?,
        },
    })
}

/// Retrieves a user profile with its roles.
///
/// # Errors
///
/// Returns an error if a query fails or a stored value is malformed.
/// Returns `Ok(None)` if the user does not exist.
pub fn get_pilot(
    conn: &mut SqliteConnection,
    pilot_id: i64,
) -> Result<Option<Pilot>, PersistenceError> {
    let row: Option<UserRow> = users::table
        .filter(users::user_id.eq(pilot_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|r| load_pilot(conn, r)).transpose()
}

/// Lists every user holding the pilot or staff role, in id order.
///
/// # Errors
///
/// Returns an error if a query fails or a stored value is malformed.
pub fn list_candidates(conn: &mut SqliteConnection) -> Result<Vec<Pilot>, PersistenceError> {
    let field_roles = [Role::Pilot.as_str(), Role::Staff.as_str()];
    let rows: Vec<UserRow> = users::table
        .filter(
            users::user_id.eq_any(
                user_roles::table
                    .filter(user_roles::role.eq_any(field_roles))
                    .select(user_roles::user_id),
            ),
        )
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    rows.into_iter().map(|r| load_pilot(conn, r)).collect()
}

/// The pilot's weekly availability rows, Sunday first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn availability_for(
    conn: &mut SqliteConnection,
    pilot_id: i64,
) -> Result<Vec<PilotAvailability>, PersistenceError> {
    const TABLE: &str = "pilot_availability";

    let rows: Vec<AvailabilityRow> = pilot_availability::table
        .filter(pilot_availability::pilot_id.eq(pilot_id))
        .order(pilot_availability::weekday.asc())
        .select(AvailabilityRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(PilotAvailability {
                pilot_id: row.pilot_id,
                weekday: weekday_from_index(row.weekday)
                    .map_err(|e| PersistenceError::malformed(TABLE, "weekday", e))?,
                is_available: decode_flag(row.is_available),
                start_time: decode_optional_time(row.start_time.as_deref(), TABLE, "start_time")?,
                end_time: decode_optional_time(row.end_time.as_deref(), TABLE, "end_time")?,
            })
        })
        .collect()
}

/// Blackouts for the pilot that overlap an inclusive window, earliest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn blackouts_overlapping(
    conn: &mut SqliteConnection,
    pilot_id: i64,
    window: DateWindow,
) -> Result<Vec<PilotBlackout>, PersistenceError> {
    const TABLE: &str = "pilot_blackouts";

    let rows: Vec<BlackoutRow> = pilot_blackouts::table
        .filter(pilot_blackouts::pilot_id.eq(pilot_id))
        .filter(pilot_blackouts::start_date.le(encode_date(window.end)))
        .filter(pilot_blackouts::end_date.ge(encode_date(window.start)))
        .order((pilot_blackouts::start_date.asc(), pilot_blackouts::blackout_id.asc()))
        .select(BlackoutRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(PilotBlackout {
                blackout_id: row.blackout_id,
                pilot_id: row.pilot_id,
                start_date: decode_date(&row.start_date, TABLE, "start_date")?,
                end_date: decode_date(&row.end_date, TABLE, "end_date")?,
                reason: row.reason,
            })
        })
        .collect()
}
