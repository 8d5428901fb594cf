// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A recurrence rule could not be parsed or is not supported.
    InvalidRule {
        /// The rule text as supplied.
        rule: String,
        /// Why the rule was rejected.
        reason: String,
    },
    /// Timezone is not a known IANA zone.
    InvalidTimezone(String),
    /// A template field failed validation.
    InvalidTemplate {
        /// The offending field.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// A pilot profile or availability field failed validation.
    InvalidPilot {
        /// The offending field.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// Occurrence status string is not recognized.
    InvalidOccurrenceStatus(String),
    /// Role string is not recognized.
    InvalidRole(String),
    /// Pipeline stage string is not recognized.
    InvalidPipelineStage(String),
    /// Client type string is not recognized.
    InvalidClientType(String),
    /// Conflict severity string is not recognized.
    InvalidSeverity(String),
    /// A date range ends before it starts.
    InvalidDateRange {
        /// The range start.
        start: chrono::NaiveDate,
        /// The range end.
        end: chrono::NaiveDate,
    },
    /// A daily availability window is empty or inverted.
    InvalidTimeWindow {
        /// The window start.
        start: chrono::NaiveTime,
        /// The window end.
        end: chrono::NaiveTime,
    },
    /// Weekday index outside 0..=6.
    InvalidWeekday(i32),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse a date or timestamp string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl DomainError {
    /// Convenience constructor for rule rejections.
    pub(crate) fn invalid_rule(rule: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRule { rule, reason } => {
                write!(f, "Invalid recurrence rule '{rule}': {reason}")
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::InvalidTemplate { field, reason } => {
                write!(f, "Invalid template field '{field}': {reason}")
            }
            Self::InvalidPilot { field, reason } => {
                write!(f, "Invalid pilot field '{field}': {reason}")
            }
            Self::InvalidOccurrenceStatus(s) => write!(f, "Invalid occurrence status: {s}"),
            Self::InvalidRole(s) => write!(f, "Invalid role: {s}"),
            Self::InvalidPipelineStage(s) => write!(f, "Invalid pipeline stage: {s}"),
            Self::InvalidClientType(s) => write!(f, "Invalid client type: {s}"),
            Self::InvalidSeverity(s) => write!(f, "Invalid conflict severity: {s}"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "Date range ends ({end}) before it starts ({start})")
            }
            Self::InvalidTimeWindow { start, end } => {
                write!(f, "Time window {start}-{end} is empty or inverted")
            }
            Self::InvalidWeekday(index) => {
                write!(f, "Invalid weekday index: {index}. Must be between 0 and 6")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
