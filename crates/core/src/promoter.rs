// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{CoreError, StoreError};
use crate::store::{InsertOutcome, JobStore, LinkOutcome, OccurrenceStore, TemplateStore};
use flightline_domain::{NewJob, OccurrenceStatus, RecurringJobOccurrence, RecurringJobTemplate};
use tracing::{info, warn};

/// Turns an occurrence into a job, exactly once.
///
/// Promotion checks before it acts. An occurrence that is already `created`
/// returns its linked job. A job left behind by an interrupted promotion is
/// found through its source occurrence and linked instead of duplicated.
///
/// # Arguments
///
/// * `store` - Template, occurrence, and job storage
/// * `occurrence_id` - The occurrence to promote
///
/// # Returns
///
/// The id of the job linked to the occurrence.
///
/// # Errors
///
/// Returns an error if:
/// - The occurrence does not exist
/// - The owning template no longer exists
/// - The store fails
pub fn promote_occurrence<S>(store: &mut S, occurrence_id: i64) -> Result<i64, CoreError>
where
    S: TemplateStore + OccurrenceStore + JobStore + ?Sized,
{
    let occurrence: RecurringJobOccurrence = store
        .get_occurrence(occurrence_id)?
        .ok_or(CoreError::OccurrenceNotFound(occurrence_id))?;

    if occurrence.status == OccurrenceStatus::Created {
        return occurrence.job_id.ok_or_else(|| {
            CoreError::Store(StoreError::Corrupt(format!(
                "occurrence {occurrence_id} is created but has no job"
            )))
        });
    }

    let template: RecurringJobTemplate = store
        .get_template(occurrence.template_id)?
        .ok_or(CoreError::TemplateNotFound(occurrence.template_id))?;

    let job_id: i64 = match store.find_job_by_source_occurrence(occurrence_id)? {
        Some(job_id) => {
            warn!(
                occurrence_id,
                job_id, "Found job from an unfinished promotion, linking it"
            );
            job_id
        }
        None => insert_job_for(store, &template, &occurrence)?,
    };

    match store.mark_occurrence_created(occurrence_id, job_id)? {
        LinkOutcome::Linked => {
            info!(
                occurrence_id,
                template_id = template.template_id,
                job_id,
                "Promoted occurrence to job"
            );
            Ok(job_id)
        }
        LinkOutcome::AlreadyLinked(existing) => Ok(existing),
    }
}

fn insert_job_for<S>(
    store: &mut S,
    template: &RecurringJobTemplate,
    occurrence: &RecurringJobOccurrence,
) -> Result<i64, CoreError>
where
    S: JobStore + ?Sized,
{
    let job: NewJob = NewJob::from_occurrence(template, occurrence);
    match store.insert_job(&job)? {
        InsertOutcome::Inserted(job_id) => Ok(job_id),
        // Another promoter got there between our lookup and insert.
        InsertOutcome::AlreadyExists => store
            .find_job_by_source_occurrence(occurrence.occurrence_id)?
            .ok_or_else(|| {
                CoreError::Store(StoreError::Corrupt(format!(
                    "job for occurrence {} reported as existing but not found",
                    occurrence.occurrence_id
                )))
            }),
    }
}
