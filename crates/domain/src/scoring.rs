// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Candidate scoring for assignment suggestions.

use crate::conflict::{Conflict, ConflictReport, Severity};
use crate::pilot::Pilot;
use serde::{Deserialize, Serialize};

/// Score every candidate starts from.
pub const BASE_SCORE: i32 = 100;
/// Deducted once per blocking conflict.
pub const ERROR_PENALTY: i32 = 50;
/// Deducted once per advisory conflict.
pub const WARNING_PENALTY: i32 = 20;
/// Fewest suggestions returned when enough candidates exist.
pub const MIN_SUGGESTIONS: usize = 5;

/// A ranked candidate for a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotSuggestion {
    pub pilot_id: i64,
    pub name: String,
    pub email: String,
    /// Always within 0..=100.
    pub score: u8,
    pub reasons: Vec<String>,
    pub conflicts: Vec<Conflict>,
}

/// Computes a candidate's score and the reasons behind it.
///
/// # Arguments
///
/// * `report` - The candidate's conflict report for the date
/// * `week_jobs` - Jobs already assigned in the calendar week of the date
/// * `month_jobs` - Jobs already assigned in the calendar month of the date
///
/// # Returns
///
/// The clamped score and human-readable reasons. Reasons are informational
/// and do not affect ordering.
#[must_use]
pub fn score_candidate(
    report: &ConflictReport,
    week_jobs: u32,
    month_jobs: u32,
) -> (u8, Vec<String>) {
    let mut reasons: Vec<String> = Vec::new();
    let mut score: i64 = i64::from(BASE_SCORE);

    let errors = i64::try_from(report.count(Severity::Error)).unwrap_or(i64::MAX / 100);
    let warnings = i64::try_from(report.count(Severity::Warning)).unwrap_or(i64::MAX / 100);
    score -= errors * i64::from(ERROR_PENALTY);
    score -= warnings * i64::from(WARNING_PENALTY);

    if report.can_schedule {
        reasons.push(String::from("No blocking conflicts"));
    } else {
        reasons.push(format!("{errors} blocking conflict(s)"));
    }
    if warnings > 0 {
        reasons.push(format!("{warnings} warning(s)"));
    }

    match week_jobs {
        0 => {
            score += 10;
            reasons.push(String::from("No jobs this week"));
        }
        1..=2 => {
            score += 5;
            reasons.push(format!("Light week ({week_jobs} jobs)"));
        }
        _ => {
            score -= 10;
            reasons.push(format!("Busy week ({week_jobs} jobs)"));
        }
    }

    if month_jobs <= 5 {
        score += 5;
        reasons.push(format!("Light month ({month_jobs} jobs)"));
    } else if month_jobs > 10 {
        score -= 5;
        reasons.push(format!("Heavy month ({month_jobs} jobs)"));
    }

    let clamped = u8::try_from(score.clamp(0, i64::from(BASE_SCORE))).unwrap_or_default();
    (clamped, reasons)
}

/// Builds a suggestion from a scored candidate.
#[must_use]
pub fn build_suggestion(
    pilot: &Pilot,
    report: ConflictReport,
    week_jobs: u32,
    month_jobs: u32,
) -> PilotSuggestion {
    let (score, reasons) = score_candidate(&report, week_jobs, month_jobs);
    PilotSuggestion {
        pilot_id: pilot.pilot_id,
        name: pilot.name.clone(),
        email: pilot.email.clone(),
        score,
        reasons,
        conflicts: report.conflicts,
    }
}

/// Sorts best-first and keeps at most `max(required * 2, 5)` entries.
///
/// The sort is stable: equal scores keep candidate enumeration order.
#[must_use]
pub fn rank_suggestions(
    mut suggestions: Vec<PilotSuggestion>,
    required: usize,
) -> Vec<PilotSuggestion> {
    suggestions.sort_by(|a, b| b.score.cmp(&a.score));
    suggestions.truncate(suggestion_limit(required));
    suggestions
}

#[must_use]
pub const fn suggestion_limit(required: usize) -> usize {
    let doubled = required.saturating_mul(2);
    if doubled > MIN_SUGGESTIONS {
        doubled
    } else {
        MIN_SUGGESTIONS
    }
}
