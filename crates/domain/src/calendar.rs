// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar windows used for workload counting.
//!
//! Weeks run Monday through Sunday. Both windows are inclusive.

use crate::error::DomainError;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Creates a window, rejecting one that ends before it starts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The Monday-to-Sunday week containing `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the week falls outside the representable range.
    pub fn week_of(date: NaiveDate) -> Result<Self, DomainError> {
        let back = u64::from(date.weekday().num_days_from_monday());
        let start = date
            .checked_sub_days(Days::new(back))
            .ok_or_else(|| overflow("computing start of week"))?;
        let end = start
            .checked_add_days(Days::new(6))
            .ok_or_else(|| overflow("computing end of week"))?;
        Ok(Self { start, end })
    }

    /// The calendar month containing `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the month falls outside the representable range.
    pub fn month_of(date: NaiveDate) -> Result<Self, DomainError> {
        let start = date
            .with_day(1)
            .ok_or_else(|| overflow("computing start of month"))?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| overflow("computing end of month"))?;
        Ok(Self { start, end })
    }
}

fn overflow(operation: &str) -> DomainError {
    DomainError::DateArithmeticOverflow {
        operation: operation.to_string(),
    }
}
