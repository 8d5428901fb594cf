// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use flightline_domain::{
    ClientRef, ClientType, ProductLine, RecurringJobTemplate, TemplateDraft,
};
use tracing::debug;

use crate::data_models::{
    StoredField, decode_enum, decode_flag, decode_optional_timestamp,
};
use crate::diesel_schema::recurring_job_templates;
use crate::error::PersistenceError;

const TABLE: &str = "recurring_job_templates";

#[derive(Queryable, Selectable)]
#[diesel(table_name = recurring_job_templates)]
struct TemplateRow {
    template_id: i64,
    name: String,
    is_active: i32,
    is_manual: i32,
    site_id: i64,
    client_type: String,
    client_id: i64,
    rrule: Option<String>,
    timezone: String,
    dtstart: Option<String>,
    dtend: Option<String>,
    window_days: i32,
    last_generated_through: Option<String>,
    payable_amount_cents: Option<i64>,
    notes: Option<String>,
    products_json: Option<String>,
    created_by: i64,
}

impl TryFrom<TemplateRow> for RecurringJobTemplate {
    type Error = PersistenceError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        let client_type: ClientType = decode_enum(&row.client_type, TABLE, "client_type")?;
        let window_days: u32 = u32::try_from(row.window_days)
            .map_err(|e| PersistenceError::malformed(TABLE, "window_days", e))?;
        let products: Vec<ProductLine> = StoredField::decode(row.products_json.as_deref())
            .or_default_for(TABLE, "products_json")?;

        Ok(Self {
            template_id: row.template_id,
            is_active: decode_flag(row.is_active),
            last_generated_through: decode_optional_timestamp(
                row.last_generated_through.as_deref(),
                TABLE,
                "last_generated_through",
            )?,
            draft: TemplateDraft {
                name: row.name,
                is_manual: decode_flag(row.is_manual),
                site_id: row.site_id,
                client: ClientRef {
                    client_type,
                    client_id: row.client_id,
                },
                rrule: row.rrule,
                timezone: row.timezone,
                dtstart: decode_optional_timestamp(row.dtstart.as_deref(), TABLE, "dtstart")?,
                dtend: decode_optional_timestamp(row.dtend.as_deref(), TABLE, "dtend")?,
                window_days,
                payable_amount_cents: row.payable_amount_cents,
                notes: row.notes,
                products,
                created_by: row.created_by,
            },
        })
    }
}

/// Retrieves a template by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a stored column is malformed.
/// Returns `Ok(None)` if the template does not exist.
pub fn get_template(
    conn: &mut SqliteConnection,
    template_id: i64,
) -> Result<Option<RecurringJobTemplate>, PersistenceError> {
    debug!(template_id, "Looking up recurring template");

    recurring_job_templates::table
        .filter(recurring_job_templates::template_id.eq(template_id))
        .select(TemplateRow::as_select())
        .first(conn)
        .optional()?
        .map(RecurringJobTemplate::try_from)
        .transpose()
}

/// Lists active, non-manual templates in id order.
///
/// # Errors
///
/// Returns an error if the query fails or any row is malformed.
pub fn list_sweepable_templates(
    conn: &mut SqliteConnection,
) -> Result<Vec<RecurringJobTemplate>, PersistenceError> {
    let rows: Vec<TemplateRow> = recurring_job_templates::table
        .filter(recurring_job_templates::is_active.eq(1))
        .filter(recurring_job_templates::is_manual.eq(0))
        .order(recurring_job_templates::template_id.asc())
        .select(TemplateRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RecurringJobTemplate::try_from).collect()
}
