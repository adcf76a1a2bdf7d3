//! Closed role set and the role → scope-field mapping table.

use serde::{Deserialize, Serialize};

/// Portal roles. Stored as text in the credential store and embedded in
/// token claims; parsing is total over this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Mentor,
    CollegeAdmin,
    CollegeCoordinator,
    IncubatorManager,
    SystemAdmin,
}

/// Which scope field anchors a role's visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    College,
    Incubator,
    Global,
}

impl Role {
    pub const ALL: [Self; 6] = [
        Self::Student,
        Self::Mentor,
        Self::CollegeAdmin,
        Self::CollegeCoordinator,
        Self::IncubatorManager,
        Self::SystemAdmin,
    ];

    /// Parse a stored role string. Returns `None` for anything outside the
    /// closed set; callers decide whether that is a 500 or a rejection.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Self::Student),
            "mentor" => Some(Self::Mentor),
            "college_admin" => Some(Self::CollegeAdmin),
            "college_coordinator" => Some(Self::CollegeCoordinator),
            "incubator_manager" => Some(Self::IncubatorManager),
            "system_admin" => Some(Self::SystemAdmin),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Mentor => "mentor",
            Self::CollegeAdmin => "college_admin",
            Self::CollegeCoordinator => "college_coordinator",
            Self::IncubatorManager => "incubator_manager",
            Self::SystemAdmin => "system_admin",
        }
    }

    /// The only place that knows which scope field belongs to which role.
    /// Adding a role means extending this match, nothing else.
    #[must_use]
    pub const fn scope_kind(self) -> ScopeKind {
        match self {
            Self::Student | Self::Mentor | Self::CollegeAdmin | Self::CollegeCoordinator => {
                ScopeKind::College
            }
            Self::IncubatorManager => ScopeKind::Incubator,
            Self::SystemAdmin => ScopeKind::Global,
        }
    }
}
