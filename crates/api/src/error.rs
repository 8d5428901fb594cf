// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::input::InputError;
use flightline::{CoreError, StoreError};
use flightline_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A rule of the scheduling model blocks the request.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        Self::InvalidInput {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// Every domain error describes bad input; none of them is a conflict with
/// stored state.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: &str = match &err {
        DomainError::InvalidRule { .. } => "rrule",
        DomainError::InvalidTimezone(_) => "timezone",
        DomainError::InvalidTemplate { field, .. } | DomainError::InvalidPilot { field, .. } => {
            field
        }
        DomainError::InvalidOccurrenceStatus(_) => "status",
        DomainError::InvalidRole(_) => "roles",
        DomainError::InvalidPipelineStage(_) => "stage",
        DomainError::InvalidClientType(_) => "client_type",
        DomainError::InvalidSeverity(_) => "severity",
        DomainError::InvalidDateRange { .. } => "end_date",
        DomainError::InvalidTimeWindow { .. } => "end_time",
        DomainError::InvalidWeekday(_) => "weekday",
        DomainError::DateArithmeticOverflow { .. } | DomainError::DateParseError { .. } => "date",
    };
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn translate_store_error(err: &StoreError) -> ApiError {
    ApiError::Internal {
        message: err.to_string(),
    }
}

fn not_found(resource_type: &str, message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message,
    }
}

fn rule_violation(rule: &str, err: &CoreError) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message: err.to_string(),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Store(ref store_err) => translate_store_error(store_err),
        CoreError::TemplateNotFound(id) => {
            not_found("Template", format!("Template {id} does not exist"))
        }
        CoreError::OccurrenceNotFound(id) => {
            not_found("Occurrence", format!("Occurrence {id} does not exist"))
        }
        CoreError::PilotNotFound(id) => not_found("Pilot", format!("Pilot {id} does not exist")),
        CoreError::JobNotFound(id) => not_found("Job", format!("Job {id} does not exist")),
        CoreError::TemplateHasMaterializedJobs { .. } => {
            rule_violation("template_has_materialized_jobs", &err)
        }
        CoreError::OccurrenceAlreadyCreated { .. } => {
            rule_violation("occurrence_already_created", &err)
        }
        CoreError::InvalidStatusTransition { .. } => {
            rule_violation("occurrence_status_transition", &err)
        }
        CoreError::JobNotScheduled(_) => rule_violation("job_requires_schedule", &err),
        CoreError::SchedulingRejected { .. } => rule_violation("hard_scheduling_constraint", &err),
        CoreError::MissingStart(_) => ApiError::InvalidInput {
            field: String::from("dtstart"),
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rule_is_input_error_on_rrule() {
        let err = translate_core_error(CoreError::DomainViolation(DomainError::InvalidRule {
            rule: String::from("FREQ=HOURLY"),
            reason: String::from("unsupported frequency"),
        }));
        assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "rrule"));
    }

    #[test]
    fn test_deletion_guard_keeps_job_count_in_message() {
        let err = translate_core_error(CoreError::TemplateHasMaterializedJobs {
            template_id: 4,
            job_count: 3,
        });
        match err {
            ApiError::DomainRuleViolation { rule, message } => {
                assert_eq!(rule, "template_has_materialized_jobs");
                assert!(message.contains('3'));
            }
            other => panic!("expected a rule violation, got {other:?}"),
        }
    }

    #[test]
    fn test_store_failure_is_internal() {
        let err = translate_core_error(CoreError::Store(StoreError::Unavailable(String::from(
            "database is locked",
        ))));
        assert!(matches!(err, ApiError::Internal { .. }));
    }
}
