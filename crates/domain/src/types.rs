// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a single recurring occurrence.
///
/// Occurrences begin `Planned`. Only the promoter moves an occurrence to
/// `Created`, after which its job link never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceStatus {
    /// Generated from the rule, not yet turned into a job.
    #[default]
    Planned,
    /// A job exists for this occurrence.
    Created,
    /// Deliberately passed over.
    Skipped,
    /// Withdrawn before it was due.
    Cancelled,
}

impl FromStr for OccurrenceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Self::Planned),
            "created" => Ok(Self::Created),
            "skipped" => Ok(Self::Skipped),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidOccurrenceStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for OccurrenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl OccurrenceStatus {
    /// Converts this status to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Created => "created",
            Self::Skipped => "skipped",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a template-level decision may move an occurrence from this
    /// status to `target`.
    ///
    /// `Created` is terminal. `Created` itself is never a valid target here;
    /// it is reached only through promotion.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Planned, Self::Skipped | Self::Cancelled)
                | (Self::Skipped, Self::Planned | Self::Cancelled)
                | (Self::Cancelled, Self::Planned)
        )
    }
}

/// Role held by a user of the operations system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
    Pilot,
    Client,
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "pilot" => Ok(Self::Pilot),
            "client" => Ok(Self::Client),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    /// Converts this role to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Pilot => "pilot",
            Self::Client => "client",
        }
    }

    /// Roles that make a user a candidate for field assignments.
    #[must_use]
    pub const fn is_field_role(&self) -> bool {
        matches!(self, Self::Pilot | Self::Staff)
    }
}

/// Stage of a job in the operations pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Newly created, awaiting scheduling. Promoted jobs start here.
    #[default]
    Intake,
    Scheduled,
    Flown,
    Processing,
    Delivered,
    Cancelled,
}

impl FromStr for PipelineStage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intake" => Ok(Self::Intake),
            "scheduled" => Ok(Self::Scheduled),
            "flown" => Ok(Self::Flown),
            "processing" => Ok(Self::Processing),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidPipelineStage(s.to_string())),
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PipelineStage {
    /// Converts this stage to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Scheduled => "scheduled",
            Self::Flown => "flown",
            Self::Processing => "processing",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Kind of party a job is performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    Organization,
    Person,
}

impl FromStr for ClientType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "organization" => Ok(Self::Organization),
            "person" => Ok(Self::Person),
            _ => Err(DomainError::InvalidClientType(s.to_string())),
        }
    }
}

impl ClientType {
    /// Converts this client type to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Person => "person",
        }
    }
}

/// Reference to the client a template or job belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientRef {
    /// Whether the client is an organization or an individual.
    pub client_type: ClientType,
    /// The client's identifier within its type.
    pub client_id: i64,
}

impl ClientRef {
    #[must_use]
    pub const fn organization(client_id: i64) -> Self {
        Self {
            client_type: ClientType::Organization,
            client_id,
        }
    }

    #[must_use]
    pub const fn person(client_id: i64) -> Self {
        Self {
            client_type: ClientType::Person,
            client_id,
        }
    }
}

/// One product line captured on a template and copied to its jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLine {
    pub product_id: i64,
    pub name: String,
    pub quantity: u32,
    /// Unit price in cents.
    pub unit_price_cents: i64,
}

/// Soft workload caps configured on a pilot profile.
///
/// `None` means no cap for that window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct WorkloadLimits {
    pub max_jobs_per_week: Option<u32>,
    pub max_jobs_per_month: Option<u32>,
}

impl WorkloadLimits {
    /// Limits with no caps configured.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_jobs_per_week: None,
            max_jobs_per_month: None,
        }
    }

    /// Whether any cap is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.max_jobs_per_week.is_some() || self.max_jobs_per_month.is_some()
    }
}
