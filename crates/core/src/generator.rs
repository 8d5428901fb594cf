// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Occurrence generation.
//!
//! ## Invariants
//!
//! - Manual templates never expand their rule
//! - At most `max_count` timestamps are considered per call
//! - A timestamp that already exists for the template is counted as skipped,
//!   whether it was found up front or lost a race on insert
//! - The watermark only moves forward, and only when something was considered

use crate::clock::Clock;
use crate::error::CoreError;
use crate::store::{InsertOutcome, OccurrenceStore, TemplateStore};
use chrono::{DateTime, TimeDelta, Utc};
use flightline_domain::{
    OccurrenceStatus, RecurringJobOccurrence, RecurringJobTemplate, parse_rule, parse_timezone,
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Default cap on timestamps considered per call.
pub const DEFAULT_MAX_COUNT: usize = 100;

const MANUAL_INSERT_ATTEMPTS: usize = 1_000;

/// Parameters of one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateRequest {
    pub template_id: i64,
    /// Explicit lower bound. When set, the watermark and "now" are not used
    /// for the start of the window.
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub max_count: usize,
}

impl GenerateRequest {
    #[must_use]
    pub const fn new(template_id: i64) -> Self {
        Self {
            template_id,
            from: None,
            to: None,
            max_count: DEFAULT_MAX_COUNT,
        }
    }

    #[must_use]
    pub const fn starting_at(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    #[must_use]
    pub const fn ending_at(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    #[must_use]
    pub const fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }
}

/// Outcome of one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GenerateResult {
    pub generated: usize,
    pub skipped: usize,
    /// The occurrences inserted by this call.
    pub occurrences: Vec<RecurringJobOccurrence>,
}

/// Expands templates into dated occurrences.
#[derive(Debug, Clone)]
pub struct OccurrenceGenerator<C> {
    clock: C,
}

/// Inclusive bounds of one expansion.
struct Window {
    start: DateTime<Utc>,
    /// The start itself was already covered by an earlier call.
    start_exclusive: bool,
    end: DateTime<Utc>,
}

impl<C: Clock> OccurrenceGenerator<C> {
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Generates occurrences for one template.
    ///
    /// # Arguments
    ///
    /// * `store` - Template and occurrence storage
    /// * `request` - Template id, optional bounds, and the per-call cap
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The template does not exist
    /// - The rule or timezone cannot be parsed
    /// - A recurring template has no start instant
    /// - The store fails
    pub fn generate<S>(
        &self,
        store: &mut S,
        request: GenerateRequest,
    ) -> Result<GenerateResult, CoreError>
    where
        S: TemplateStore + OccurrenceStore + ?Sized,
    {
        let template: RecurringJobTemplate = store
            .get_template(request.template_id)?
            .ok_or(CoreError::TemplateNotFound(request.template_id))?;
        let now: DateTime<Utc> = self.clock.now();

        if template.is_manual() {
            return Self::generate_manual(store, &template, request.from.unwrap_or(now));
        }

        let Some(rule_text) = template.expandable_rule() else {
            debug!(
                template_id = template.template_id,
                "Template has no recurrence rule, nothing to generate"
            );
            return Ok(GenerateResult::default());
        };

        let rule = parse_rule(rule_text)?;
        let tz = parse_timezone(&template.draft.timezone)?;
        let dtstart: DateTime<Utc> = template
            .draft
            .dtstart
            .or_else(|| rule.embedded_start(tz))
            .ok_or(CoreError::MissingStart(template.template_id))?;

        let window: Window = Self::window(&template, &request, dtstart, now);
        if window.end < window.start {
            debug!(
                template_id = template.template_id,
                start = %window.start,
                end = %window.end,
                "Generation window is empty"
            );
            return Ok(GenerateResult::default());
        }

        let candidates: Vec<DateTime<Utc>> = rule
            .occurrences(dtstart, tz)
            .skip_while(|t| {
                *t < window.start || (window.start_exclusive && *t == window.start)
            })
            .take_while(|t| *t <= window.end)
            .take(request.max_count)
            .collect();

        let (Some(first), Some(last)) = (candidates.first().copied(), candidates.last().copied())
        else {
            debug!(
                template_id = template.template_id,
                start = %window.start,
                end = %window.end,
                "Rule yields nothing in window"
            );
            return Ok(GenerateResult::default());
        };

        let existing: HashSet<DateTime<Utc>> = store
            .list_occurrences(template.template_id, Some(first), Some(last))?
            .into_iter()
            .map(|o| o.occurs_at)
            .collect();

        let mut result = GenerateResult::default();
        for occurs_at in candidates {
            if existing.contains(&occurs_at) {
                result.skipped += 1;
                continue;
            }
            match store.insert_occurrence(template.template_id, occurs_at)? {
                InsertOutcome::Inserted(occurrence_id) => {
                    result.generated += 1;
                    result.occurrences.push(planned(
                        occurrence_id,
                        template.template_id,
                        occurs_at,
                    ));
                }
                InsertOutcome::AlreadyExists => result.skipped += 1,
            }
        }

        store.advance_watermark(template.template_id, last)?;

        info!(
            template_id = template.template_id,
            generated = result.generated,
            skipped = result.skipped,
            through = %last,
            "Generated occurrences"
        );

        Ok(result)
    }

    fn generate_manual<S>(
        store: &mut S,
        template: &RecurringJobTemplate,
        occurs_at: DateTime<Utc>,
    ) -> Result<GenerateResult, CoreError>
    where
        S: OccurrenceStore + ?Sized,
    {
        let mut result = GenerateResult::default();
        let mut candidate = occurs_at;
        for _ in 0..MANUAL_INSERT_ATTEMPTS {
            match store.insert_occurrence(template.template_id, candidate)? {
                InsertOutcome::Inserted(occurrence_id) => {
                    result.generated = 1;
                    result
                        .occurrences
                        .push(planned(occurrence_id, template.template_id, candidate));
                    info!(
                        template_id = template.template_id,
                        occurs_at = %candidate,
                        "Created manual occurrence"
                    );
                    return Ok(result);
                }
                // Manual occurrences are never deduplicated; an equal instant
                // moves to the next free nanosecond.
                InsertOutcome::AlreadyExists => candidate += TimeDelta::nanoseconds(1),
            }
        }

        result.skipped = 1;
        debug!(
            template_id = template.template_id,
            occurs_at = %occurs_at,
            "No free instant for manual occurrence"
        );
        Ok(result)
    }

    fn window(
        template: &RecurringJobTemplate,
        request: &GenerateRequest,
        dtstart: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Window {
        let (start, start_exclusive) = match request.from {
            Some(from) => (from.max(dtstart), false),
            None => {
                let floor = dtstart.max(now);
                match template.last_generated_through {
                    Some(watermark) if watermark >= floor => (watermark, true),
                    _ => (floor, false),
                }
            }
        };

        let horizon = TimeDelta::try_days(i64::from(template.draft.window_days))
            .and_then(|span| now.checked_add_signed(span))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut end = request.to.map_or(horizon, |to| to.min(horizon));
        if let Some(dtend) = template.draft.dtend {
            end = end.min(dtend);
        }

        Window {
            start,
            start_exclusive,
            end,
        }
    }
}

const fn planned(
    occurrence_id: i64,
    template_id: i64,
    occurs_at: DateTime<Utc>,
) -> RecurringJobOccurrence {
    RecurringJobOccurrence {
        occurrence_id,
        template_id,
        occurs_at,
        status: OccurrenceStatus::Planned,
        job_id: None,
    }
}
