// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurring job templates and the occurrences expanded from them.

use crate::types::{ClientRef, OccurrenceStatus, ProductLine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default rolling generation window, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 60;

/// The editable portion of a template.
///
/// Used both to create a template and to replace its definition. Fields
/// owned by the engine (identity, active flag, watermark) are not part of
/// the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    /// Manual templates never expand their rule.
    pub is_manual: bool,
    pub site_id: i64,
    pub client: ClientRef,
    /// RRULE text; `None` for manual templates or templates not yet configured.
    pub rrule: Option<String>,
    /// IANA timezone the rule is expanded in.
    pub timezone: String,
    pub dtstart: Option<DateTime<Utc>>,
    pub dtend: Option<DateTime<Utc>>,
    /// Rolling window, in days ahead of "now", that a sweep generates into.
    pub window_days: u32,
    /// Default payable amount in cents, copied to promoted jobs.
    pub payable_amount_cents: Option<i64>,
    pub notes: Option<String>,
    pub products: Vec<ProductLine>,
    pub created_by: i64,
}

/// A recurring obligation: what work to create and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringJobTemplate {
    pub template_id: i64,
    pub is_active: bool,
    /// Latest instant through which occurrences have been considered.
    ///
    /// Only ever moves forward.
    pub last_generated_through: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub draft: TemplateDraft,
}

impl RecurringJobTemplate {
    /// Builds a freshly created template: active, never generated.
    #[must_use]
    pub const fn new(template_id: i64, draft: TemplateDraft) -> Self {
        Self {
            template_id,
            is_active: true,
            last_generated_through: None,
            draft,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.draft.name
    }

    #[must_use]
    pub const fn is_manual(&self) -> bool {
        self.draft.is_manual
    }

    /// The rule to expand, or `None` when expansion does not apply.
    ///
    /// Manual templates report `None` even if rule text is stored.
    #[must_use]
    pub fn expandable_rule(&self) -> Option<&str> {
        if self.draft.is_manual {
            return None;
        }
        self.draft
            .rrule
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Whether the sweep should expand this template.
    #[must_use]
    pub const fn is_sweepable(&self) -> bool {
        self.is_active && !self.draft.is_manual
    }
}

/// One dated instance of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringJobOccurrence {
    pub occurrence_id: i64,
    pub template_id: i64,
    pub occurs_at: DateTime<Utc>,
    pub status: OccurrenceStatus,
    /// Set exactly when `status` is `Created`.
    pub job_id: Option<i64>,
}

impl RecurringJobOccurrence {
    /// Whether the occurrence is planned and its time has arrived.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == OccurrenceStatus::Planned && self.occurs_at <= now
    }
}
