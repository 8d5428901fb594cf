// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Template and occurrence lifecycle operations.

use crate::error::CoreError;
use crate::store::{OccurrenceStore, TemplateStore};
use chrono::{DateTime, Utc};
use flightline_domain::{
    OccurrenceStatus, RecurringJobOccurrence, RecurringJobTemplate, TemplateDraft,
    validate_template,
};
use tracing::info;

/// Validates and stores a new template.
///
/// # Errors
///
/// Returns an error if the draft fails validation (including an unparsable
/// rule) or the store fails.
pub fn create_template<S>(
    store: &mut S,
    draft: &TemplateDraft,
) -> Result<RecurringJobTemplate, CoreError>
where
    S: TemplateStore + ?Sized,
{
    validate_template(draft)?;
    let template: RecurringJobTemplate = store.insert_template(draft)?;
    info!(
        template_id = template.template_id,
        name = %template.name(),
        manual = template.is_manual(),
        "Created recurring template"
    );
    Ok(template)
}

/// # Errors
///
/// Returns an error if the template does not exist or the store fails.
pub fn get_template<S>(store: &mut S, template_id: i64) -> Result<RecurringJobTemplate, CoreError>
where
    S: TemplateStore + ?Sized,
{
    store
        .get_template(template_id)?
        .ok_or(CoreError::TemplateNotFound(template_id))
}

/// Replaces a template's definition. The watermark is preserved.
///
/// # Errors
///
/// Returns an error if the draft fails validation, the template does not
/// exist, or the store fails.
pub fn update_template<S>(
    store: &mut S,
    template_id: i64,
    draft: &TemplateDraft,
) -> Result<RecurringJobTemplate, CoreError>
where
    S: TemplateStore + ?Sized,
{
    validate_template(draft)?;
    if !store.update_template(template_id, draft)? {
        return Err(CoreError::TemplateNotFound(template_id));
    }
    info!(template_id, "Updated recurring template");
    get_template(store, template_id)
}

/// # Errors
///
/// Returns an error if the template does not exist or the store fails.
pub fn set_template_active<S>(
    store: &mut S,
    template_id: i64,
    active: bool,
) -> Result<RecurringJobTemplate, CoreError>
where
    S: TemplateStore + ?Sized,
{
    if !store.set_template_active(template_id, active)? {
        return Err(CoreError::TemplateNotFound(template_id));
    }
    info!(template_id, active, "Changed template active flag");
    get_template(store, template_id)
}

/// Deletes a template and its occurrences.
///
/// # Errors
///
/// Returns `CoreError::TemplateHasMaterializedJobs` if any occurrence has
/// been promoted, `CoreError::TemplateNotFound` if the template does not
/// exist, or a store error.
pub fn delete_template<S>(store: &mut S, template_id: i64) -> Result<(), CoreError>
where
    S: TemplateStore + OccurrenceStore + ?Sized,
{
    get_template(store, template_id)?;

    let job_count: u64 = store.count_created_occurrences(template_id)?;
    if job_count > 0 {
        return Err(CoreError::TemplateHasMaterializedJobs {
            template_id,
            job_count,
        });
    }

    if !store.delete_template(template_id)? {
        return Err(CoreError::TemplateNotFound(template_id));
    }
    info!(template_id, "Deleted recurring template and its occurrences");
    Ok(())
}

/// # Errors
///
/// Returns an error if the template does not exist or the store fails.
pub fn list_occurrences<S>(
    store: &mut S,
    template_id: i64,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<RecurringJobOccurrence>, CoreError>
where
    S: TemplateStore + OccurrenceStore + ?Sized,
{
    get_template(store, template_id)?;
    Ok(store.list_occurrences(template_id, from, to)?)
}

/// Skips, cancels, or re-plans an occurrence that has not become a job.
///
/// # Errors
///
/// Returns an error if:
/// - The occurrence does not exist
/// - The occurrence is already `created`
/// - The transition is not allowed
/// - The store fails
pub fn set_occurrence_status<S>(
    store: &mut S,
    occurrence_id: i64,
    status: OccurrenceStatus,
) -> Result<RecurringJobOccurrence, CoreError>
where
    S: OccurrenceStore + ?Sized,
{
    let occurrence: RecurringJobOccurrence = store
        .get_occurrence(occurrence_id)?
        .ok_or(CoreError::OccurrenceNotFound(occurrence_id))?;

    if occurrence.status == OccurrenceStatus::Created {
        return Err(CoreError::OccurrenceAlreadyCreated {
            occurrence_id,
            job_id: occurrence.job_id,
        });
    }
    if occurrence.status == status {
        return Ok(occurrence);
    }
    if !occurrence.status.can_transition_to(status) {
        return Err(CoreError::InvalidStatusTransition {
            occurrence_id,
            from: occurrence.status,
            to: status,
        });
    }

    // A concurrent promotion may have won since the read above.
    if !store.set_occurrence_status(occurrence_id, status)? {
        return Err(CoreError::OccurrenceAlreadyCreated {
            occurrence_id,
            job_id: store.get_occurrence(occurrence_id)?.and_then(|o| o.job_id),
        });
    }

    info!(
        occurrence_id,
        from = %occurrence.status,
        to = %status,
        "Changed occurrence status"
    );

    Ok(RecurringJobOccurrence {
        status,
        ..occurrence
    })
}
