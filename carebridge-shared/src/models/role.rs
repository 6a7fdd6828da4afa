use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::routes::Route;

/// Account roles carried in the credential's `role` claim.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Donor,
    Charity,
    Admin,
}

impl Role {
    /// Return the canonical claim value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Charity => "charity",
            Self::Admin => "admin",
        }
    }

    /// The dashboard a freshly signed-in user of this role lands on.
    #[must_use]
    pub fn landing_route(self) -> Route {
        match self {
            Self::Admin => Route::AdminDashboard,
            Self::Charity => Route::CharityDashboard,
            Self::Donor => Route::DonorDashboard,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "donor" => Ok(Self::Donor),
            "charity" => Ok(Self::Charity),
            "admin" => Ok(Self::Admin),
            _ => Err("unknown role"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        for (text, role) in [
            ("donor", Role::Donor),
            ("charity", Role::Charity),
            ("admin", Role::Admin),
        ] {
            assert_eq!(role.as_str(), text);
            assert_eq!(role.to_string(), text);
            assert_eq!(Role::from_str(text).unwrap(), role);
        }
    }

    #[test]
    fn role_invalid() {
        assert!(Role::from_str("volunteer").is_err());
        assert!(Role::from_str("Admin").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn role_serializes_as_claim_value() {
        let json = serde_json::to_string(&Role::Charity).unwrap();
        assert_eq!(json, "\"charity\"");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn landing_routes() {
        assert_eq!(Role::Admin.landing_route().path(), "/admin-dashboard");
        assert_eq!(Role::Charity.landing_route().path(), "/charity-dashboard");
        assert_eq!(Role::Donor.landing_route().path(), "/donor-dashboard");
    }
}
