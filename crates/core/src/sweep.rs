// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::clock::Clock;
use crate::error::CoreError;
use crate::generator::{DEFAULT_MAX_COUNT, GenerateRequest, OccurrenceGenerator};
use crate::promoter::promote_occurrence;
use crate::store::{JobStore, OccurrenceStore, TemplateStore};
use flightline_domain::RecurringJobTemplate;
use serde::Serialize;
use tracing::{info, warn};

/// A template the sweep could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    pub template_id: i64,
    pub message: String,
}

/// Summary of one sweep.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SweepResult {
    /// Templates processed without error.
    pub processed: usize,
    /// Occurrences generated across all templates.
    pub total_occurrences: usize,
    /// Occurrences promoted to jobs across all templates.
    pub total_jobs: usize,
    pub errors: Vec<SweepFailure>,
}

/// Periodic driver: generate, then promote whatever is due.
#[derive(Debug, Clone)]
pub struct SweepCoordinator<C> {
    generator: OccurrenceGenerator<C>,
    clock: C,
    max_count: usize,
}

impl<C: Clock + Clone> SweepCoordinator<C> {
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self::with_max_count(clock, DEFAULT_MAX_COUNT)
    }

    #[must_use]
    pub fn with_max_count(clock: C, max_count: usize) -> Self {
        Self {
            generator: OccurrenceGenerator::new(clock.clone()),
            clock,
            max_count,
        }
    }

    /// Runs one pass over every active, non-manual template.
    ///
    /// A failure on one template is recorded and the sweep moves on.
    ///
    /// # Errors
    ///
    /// Returns an error only if the template list itself cannot be read.
    pub fn sweep<S>(&self, store: &mut S) -> Result<SweepResult, CoreError>
    where
        S: TemplateStore + OccurrenceStore + JobStore + ?Sized,
    {
        let templates: Vec<RecurringJobTemplate> = store.list_sweepable_templates()?;
        let mut result = SweepResult::default();

        for template in &templates {
            match self.sweep_template(store, template) {
                Ok((occurrences, jobs)) => {
                    result.processed += 1;
                    result.total_occurrences += occurrences;
                    result.total_jobs += jobs;
                }
                Err(e) => {
                    warn!(
                        template_id = template.template_id,
                        error = %e,
                        "Sweep failed for template"
                    );
                    result.errors.push(SweepFailure {
                        template_id: template.template_id,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            templates = templates.len(),
            processed = result.processed,
            occurrences = result.total_occurrences,
            jobs = result.total_jobs,
            failed = result.errors.len(),
            "Sweep complete"
        );

        Ok(result)
    }

    fn sweep_template<S>(
        &self,
        store: &mut S,
        template: &RecurringJobTemplate,
    ) -> Result<(usize, usize), CoreError>
    where
        S: TemplateStore + OccurrenceStore + JobStore + ?Sized,
    {
        let generated = self.generator.generate(
            store,
            GenerateRequest::new(template.template_id).max_count(self.max_count),
        )?;

        let due = store.list_due_occurrences(template.template_id, self.clock.now())?;
        let mut promoted: usize = 0;
        for occurrence in &due {
            promote_occurrence(store, occurrence.occurrence_id)?;
            promoted += 1;
        }

        Ok((generated.generated, promoted))
    }
}
