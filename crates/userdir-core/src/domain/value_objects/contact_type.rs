//! Contact type value object.

use crate::DirectoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of contact channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactType {
    Phone,
    Work,
    Whatsapp,
}

impl ContactType {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "PHONE",
            Self::Work => "WORK",
            Self::Whatsapp => "WHATSAPP",
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactType {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PHONE" => Ok(Self::Phone),
            "WORK" => Ok(Self::Work),
            "WHATSAPP" => Ok(Self::Whatsapp),
            other => Err(DirectoryError::validation(format!(
                "Invalid contact type '{other}', expected PHONE, WORK or WHATSAPP"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_type_round_trips_through_str() {
        for kind in [ContactType::Phone, ContactType::Work, ContactType::Whatsapp] {
            assert_eq!(kind.as_str().parse::<ContactType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_contact_type_json_is_upper_case() {
        assert_eq!(serde_json::to_string(&ContactType::Whatsapp).unwrap(), "\"WHATSAPP\"");
    }

    #[test]
    fn test_unknown_contact_type_is_validation_error() {
        let err = "EMAIL".parse::<ContactType>().unwrap_err();
        assert!(matches!(err, DirectoryError::Validation(_)));
    }
}
