// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use diesel::prelude::*;
use flightline_domain::TemplateDraft;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{encode_flag, encode_json, encode_timestamp};
use crate::diesel_schema::{recurring_job_occurrences, recurring_job_templates};
use crate::error::PersistenceError;

fn window_days(draft: &TemplateDraft) -> Result<i32, PersistenceError> {
    i32::try_from(draft.window_days)
        .map_err(|e| PersistenceError::Other(format!("window_days out of range: {e}")))
}

/// Inserts a template, active and without a watermark.
///
/// # Returns
///
/// The new template ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_template(
    conn: &mut SqliteConnection,
    draft: &TemplateDraft,
) -> Result<i64, PersistenceError> {
    let products_json: String = encode_json(&draft.products)?;

    diesel::insert_into(recurring_job_templates::table)
        .values((
            recurring_job_templates::name.eq(&draft.name),
            recurring_job_templates::is_active.eq(1),
            recurring_job_templates::is_manual.eq(encode_flag(draft.is_manual)),
            recurring_job_templates::site_id.eq(draft.site_id),
            recurring_job_templates::client_type.eq(draft.client.client_type.as_str()),
            recurring_job_templates::client_id.eq(draft.client.client_id),
            recurring_job_templates::rrule.eq(draft.rrule.as_deref()),
            recurring_job_templates::timezone.eq(&draft.timezone),
            recurring_job_templates::dtstart.eq(draft.dtstart.map(encode_timestamp)),
            recurring_job_templates::dtend.eq(draft.dtend.map(encode_timestamp)),
            recurring_job_templates::window_days.eq(window_days(draft)?),
            recurring_job_templates::payable_amount_cents.eq(draft.payable_amount_cents),
            recurring_job_templates::notes.eq(draft.notes.as_deref()),
            recurring_job_templates::products_json.eq(&products_json),
            recurring_job_templates::created_by.eq(draft.created_by),
        ))
        .execute(conn)?;

    let template_id: i64 = conn.get_last_insert_rowid()?;
    info!(template_id, "Inserted recurring template");
    Ok(template_id)
}

/// Replaces a template's definition, leaving its active flag and watermark.
///
/// # Returns
///
/// `true` if the template existed.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_template(
    conn: &mut SqliteConnection,
    template_id: i64,
    draft: &TemplateDraft,
) -> Result<bool, PersistenceError> {
    let products_json: String = encode_json(&draft.products)?;

    let updated: usize = diesel::update(recurring_job_templates::table)
        .filter(recurring_job_templates::template_id.eq(template_id))
        .set((
            recurring_job_templates::name.eq(&draft.name),
            recurring_job_templates::is_manual.eq(encode_flag(draft.is_manual)),
            recurring_job_templates::site_id.eq(draft.site_id),
            recurring_job_templates::client_type.eq(draft.client.client_type.as_str()),
            recurring_job_templates::client_id.eq(draft.client.client_id),
            recurring_job_templates::rrule.eq(draft.rrule.as_deref()),
            recurring_job_templates::timezone.eq(&draft.timezone),
            recurring_job_templates::dtstart.eq(draft.dtstart.map(encode_timestamp)),
            recurring_job_templates::dtend.eq(draft.dtend.map(encode_timestamp)),
            recurring_job_templates::window_days.eq(window_days(draft)?),
            recurring_job_templates::payable_amount_cents.eq(draft.payable_amount_cents),
            recurring_job_templates::notes.eq(draft.notes.as_deref()),
            recurring_job_templates::products_json.eq(&products_json),
            recurring_job_templates::updated_at
                .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    Ok(updated > 0)
}

/// # Errors
///
/// Returns an error if the update fails.
pub fn set_template_active(
    conn: &mut SqliteConnection,
    template_id: i64,
    active: bool,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(recurring_job_templates::table)
        .filter(recurring_job_templates::template_id.eq(template_id))
        .set(recurring_job_templates::is_active.eq(encode_flag(active)))
        .execute(conn)?;

    Ok(updated > 0)
}

/// Deletes a template and all of its occurrences in one transaction.
///
/// The caller is responsible for refusing templates with promoted
/// occurrences.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_template(
    conn: &mut SqliteConnection,
    template_id: i64,
) -> Result<bool, PersistenceError> {
    conn.transaction(|conn| {
        let occurrences: usize = diesel::delete(
            recurring_job_occurrences::table
                .filter(recurring_job_occurrences::template_id.eq(template_id)),
        )
        .execute(conn)?;
        let templates: usize = diesel::delete(
            recurring_job_templates::table
                .filter(recurring_job_templates::template_id.eq(template_id)),
        )
        .execute(conn)?;

        debug!(template_id, occurrences, "Deleted template rows");
        Ok(templates > 0)
    })
}

/// Moves the watermark forward. A value at or behind the stored one is
/// ignored.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn advance_watermark(
    conn: &mut SqliteConnection,
    template_id: i64,
    through: DateTime<Utc>,
) -> Result<(), PersistenceError> {
    let through: String = encode_timestamp(through);

    let updated: usize = diesel::update(recurring_job_templates::table)
        .filter(recurring_job_templates::template_id.eq(template_id))
        .filter(
            recurring_job_templates::last_generated_through
                .is_null()
                .or(recurring_job_templates::last_generated_through.lt(&through)),
        )
        .set(recurring_job_templates::last_generated_through.eq(&through))
        .execute(conn)?;

    debug!(template_id, %through, advanced = updated > 0, "Watermark write");
    Ok(())
}
