// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::template::{RecurringJobOccurrence, RecurringJobTemplate};
use crate::types::{ClientRef, PipelineStage, ProductLine};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Typed side-table data attached to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct JobMetadata {
    /// Amount payable to the assigned pilot, in cents.
    pub payable_amount_cents: Option<i64>,
    pub notes: Option<String>,
    pub source_template_id: Option<i64>,
    /// The occurrence this job was promoted from. Unique across jobs.
    pub source_occurrence_id: Option<i64>,
}

/// A job that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
    pub name: String,
    pub site_id: i64,
    pub client: ClientRef,
    pub products: Vec<ProductLine>,
    /// Dates the job has previously been scheduled on.
    pub date_history: Vec<NaiveDate>,
    pub stage: PipelineStage,
    pub scheduled_date: Option<NaiveDate>,
    pub metadata: JobMetadata,
}

impl NewJob {
    /// Builds the job a due occurrence is promoted into.
    ///
    /// The job starts at intake with no dates; name, site, client, and
    /// products come from the template, and payable amount and notes are
    /// copied into the metadata.
    #[must_use]
    pub fn from_occurrence(
        template: &RecurringJobTemplate,
        occurrence: &RecurringJobOccurrence,
    ) -> Self {
        Self {
            name: template.draft.name.clone(),
            site_id: template.draft.site_id,
            client: template.draft.client,
            products: template.draft.products.clone(),
            date_history: Vec::new(),
            stage: PipelineStage::Intake,
            scheduled_date: None,
            metadata: JobMetadata {
                payable_amount_cents: template.draft.payable_amount_cents,
                notes: template.draft.notes.clone(),
                source_template_id: Some(template.template_id),
                source_occurrence_id: Some(occurrence.occurrence_id),
            },
        }
    }
}

/// A stored job together with its assigned pilots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: i64,
    #[serde(flatten)]
    pub details: NewJob,
    pub assigned_pilots: Vec<i64>,
}

impl Job {
    #[must_use]
    pub fn is_assigned_to(&self, pilot_id: i64) -> bool {
        self.assigned_pilots.contains(&pilot_id)
    }

    #[must_use]
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            job_id: self.job_id,
            name: self.details.name.clone(),
        }
    }
}

/// Identifies a job in conflict details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: i64,
    pub name: String,
}
