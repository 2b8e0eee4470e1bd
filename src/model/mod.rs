//! Core data model.
//!
//! Two record kinds move through the engine: customer event requests and
//! sub-team task distributions. Both are identified by a store-assigned
//! [`RecordId`] and carry the [`Role`] that created them.

pub mod event_request;
pub mod task_distribution;

pub use event_request::*;
pub use task_distribution::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// ---------------------------------------------------------------------------
// Record ID
// ---------------------------------------------------------------------------

/// Newtype for store-assigned record IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First 8 chars of the UUID, for tables and log lines.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Organizational role of the acting party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Customer Service. Opens event requests.
    Cs,
    /// Senior Customer Service. First reviewer.
    Scs,
    /// Financial Manager.
    Fm,
    /// Administration Manager. Final sign-off on event requests.
    Am,
    /// Production Manager. Plans task distributions.
    Pm,
    /// Service Manager. Plans task distributions.
    Sm,
    /// Human Resources.
    Hr,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Cs,
        Role::Scs,
        Role::Fm,
        Role::Am,
        Role::Pm,
        Role::Sm,
        Role::Hr,
    ];

    /// Short code used on the wire and in the user directory.
    pub fn code(self) -> &'static str {
        match self {
            Role::Cs => "CS",
            Role::Scs => "SCS",
            Role::Fm => "FM",
            Role::Am => "AM",
            Role::Pm => "PM",
            Role::Sm => "SM",
            Role::Hr => "HR",
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            Role::Cs => "Customer Service",
            Role::Scs => "Senior Customer Service",
            Role::Fm => "Financial Manager",
            Role::Am => "Administration Manager",
            Role::Pm => "Production Manager",
            Role::Sm => "Service Manager",
            Role::Hr => "Human Resources",
        }
    }

    /// Roles that plan and review sub-team work.
    pub fn is_planner(self) -> bool {
        matches!(self, Role::Pm | Role::Sm)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.code() == s)
            .ok_or_else(|| Error::UnknownRole(s.to_string()))
    }
}
