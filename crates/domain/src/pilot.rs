// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pilot profiles and their declared availability.
//!
//! ## Invariants
//!
//! - A pilot with no availability rows at all is fully available
//! - Blackouts are always restrictive, with or without availability rows
//! - Blackout ranges are inclusive on both ends

use crate::error::DomainError;
use crate::types::{Role, WorkloadLimits};
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// A user who may be considered for field assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    pub pilot_id: i64,
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub limits: WorkloadLimits,
}

impl Pilot {
    /// Whether the role set makes this user an assignment candidate.
    #[must_use]
    pub fn is_candidate(&self) -> bool {
        self.roles.iter().any(Role::is_field_role)
    }
}

/// A pilot profile that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPilot {
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub limits: WorkloadLimits,
}

/// One row of a pilot's weekly working pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotAvailability {
    pub pilot_id: i64,
    pub weekday: Weekday,
    pub is_available: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl PilotAvailability {
    /// Length of the declared time window in hours, if both ends are set.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn window_hours(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end > start => {
                Some((end - start).num_minutes() as f64 / 60.0)
            }
            _ => None,
        }
    }
}

/// An explicit date range during which a pilot cannot work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotBlackout {
    pub blackout_id: i64,
    pub pilot_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl PilotBlackout {
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Storage index of a weekday, Sunday = 0.
#[must_use]
pub fn weekday_index(weekday: Weekday) -> i32 {
    // num_days_from_sunday is at most 6
    i32::try_from(weekday.num_days_from_sunday()).unwrap_or_default()
}

/// Parses a storage weekday index, Sunday = 0.
///
/// # Errors
///
/// Returns an error if the index is outside 0..=6.
pub const fn weekday_from_index(index: i32) -> Result<Weekday, DomainError> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(DomainError::InvalidWeekday(index)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_index_round_trips_sunday_based() {
        assert_eq!(weekday_index(Weekday::Sun), 0);
        assert_eq!(weekday_index(Weekday::Sat), 6);
        assert_eq!(weekday_from_index(1).unwrap(), Weekday::Mon);
        assert!(weekday_from_index(7).is_err());
    }

    #[test]
    fn test_blackout_covers_inclusive_range() {
        let blackout = PilotBlackout {
            blackout_id: 1,
            pilot_id: 7,
            start_date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
            reason: None,
        };

        assert!(blackout.covers(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()));
        assert!(blackout.covers(NaiveDate::from_ymd_opt(2025, 2, 5).unwrap()));
        assert!(!blackout.covers(NaiveDate::from_ymd_opt(2025, 2, 6).unwrap()));
    }

    #[test]
    fn test_window_hours_requires_both_ends() {
        let mut row = PilotAvailability {
            pilot_id: 7,
            weekday: Weekday::Mon,
            is_available: true,
            start_time: NaiveTime::from_hms_opt(8, 0, 0),
            end_time: NaiveTime::from_hms_opt(11, 30, 0),
        };
        assert_eq!(row.window_hours(), Some(3.5));

        row.end_time = None;
        assert_eq!(row.window_hours(), None);
    }

    #[test]
    fn test_staff_and_pilots_are_candidates() {
        let mut pilot = Pilot {
            pilot_id: 1,
            name: String::from("Ana"),
            email: String::from("ana@example.com"),
            roles: vec![Role::Client],
            limits: WorkloadLimits::unlimited(),
        };
        assert!(!pilot.is_candidate());

        pilot.roles.push(Role::Staff);
        assert!(pilot.is_candidate());
    }
}
