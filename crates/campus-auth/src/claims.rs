//! JWT claim structures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role a user acts under. Stored and transmitted upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "TEACHER" => Ok(Role::Teacher),
            "STUDENT" => Ok(Role::Student),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Access token claims.
///
/// Carries everything the authorization checks need so no database lookup happens per request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Username (subject claim)
    pub sub: String,
    pub role: Role,
    /// Teacher or student record the account acts for, if any
    pub reference_id: Option<String>,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), r#""TEACHER""#);
        let role: Role = serde_json::from_str(r#""ADMIN""#).unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_role_from_str_is_case_insensitive() {
        assert_eq!("student".parse::<Role>(), Ok(Role::Student));
        assert!("registrar".parse::<Role>().is_err());
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"jdoe","role":"TEACHER","reference_id":"PROF-001","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.sub, "jdoe");
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.reference_id.as_deref(), Some("PROF-001"));
        assert!(claims.has_any_role(&[Role::Admin, Role::Teacher]));
        assert!(!claims.has_any_role(&[Role::Admin]));
    }
}
