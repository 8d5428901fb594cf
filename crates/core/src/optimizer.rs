// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::conflicts::{PilotEvaluation, evaluate_pilot};
use crate::error::CoreError;
use crate::store::{JobStore, PilotStore};
use chrono::NaiveDate;
use flightline_domain::{PilotSuggestion, build_suggestion, rank_suggestions};
use tracing::info;

/// Default number of pilots a job needs.
pub const DEFAULT_REQUIRED_COUNT: usize = 1;
/// Default job length used for availability checks.
pub const DEFAULT_DURATION_HOURS: f64 = 4.0;

/// Ranks candidate pilots for a date, best first.
///
/// Every pilot or staff user is scored; blocked candidates stay in the list
/// with a low score so the caller can see why.
///
/// # Arguments
///
/// * `store` - Pilot and job storage
/// * `date` - The date to staff
/// * `required_count` - How many pilots the work needs
/// * `duration_hours` - Expected length of the work
///
/// # Returns
///
/// Up to `max(required_count * 2, 5)` suggestions.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn suggest_pilots<S>(
    store: &mut S,
    date: NaiveDate,
    required_count: usize,
    duration_hours: f64,
) -> Result<Vec<PilotSuggestion>, CoreError>
where
    S: PilotStore + JobStore + ?Sized,
{
    let candidates = store.list_candidates()?;
    let mut suggestions: Vec<PilotSuggestion> = Vec::with_capacity(candidates.len());

    for pilot in &candidates {
        let PilotEvaluation {
            report,
            week_jobs,
            month_jobs,
        } = evaluate_pilot(store, pilot, date, duration_hours)?;
        suggestions.push(build_suggestion(pilot, report, week_jobs, month_jobs));
    }

    let ranked: Vec<PilotSuggestion> = rank_suggestions(suggestions, required_count);

    info!(
        %date,
        candidates = candidates.len(),
        returned = ranked.len(),
        top_score = ranked.first().map(|s| s.score),
        "Ranked pilot suggestions"
    );

    Ok(ranked)
}
