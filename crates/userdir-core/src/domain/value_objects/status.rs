//! User status value object.

use crate::DirectoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// User account is active.
    #[default]
    Active,
    /// User account is blocked.
    Blocked,
}

impl UserStatus {
    /// Checks if the account is considered active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Blocked => "BLOCKED",
        }
    }

    /// All possible statuses.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Active, Self::Blocked]
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "BLOCKED" => Ok(Self::Blocked),
            other => Err(DirectoryError::validation(format!(
                "Invalid status '{other}', expected ACTIVE or BLOCKED"
            ))),
        }
    }
}
