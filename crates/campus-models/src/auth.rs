//! Authentication models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub use campus_auth::{Claims, Role};

/// Sentinel `reference_id` that asks the server to allocate the next numeric reference.
pub const AUTO_REFERENCE: &str = "AUTO";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 4, max = 20))]
    #[schema(example = "registrar")]
    pub username: String,
    #[validate(length(min = 6, max = 20))]
    #[schema(example = "secret123")]
    pub password: String,
    /// Teacher or student record to link, or `AUTO`
    pub reference_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Row of the `users` table. The password column holds a bcrypt hash.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub username: String,
    pub password: String,
    pub role: String,
    pub reference_id: Option<String>,
}

impl User {
    /// Unknown stored roles fall back to the least privileged one.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::Student)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub username: String,
    pub role: Role,
    pub reference_id: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            role: user.role(),
            username: user.username,
            reference_id: user.reference_id,
        }
    }
}

impl From<Claims> for UserResponse {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
            reference_id: claims.reference_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_length_rules() {
        let short = RegisterRequest {
            username: "abc".into(),
            password: "secret123".into(),
            reference_id: None,
        };
        assert!(short.validate().is_err());

        let ok = RegisterRequest {
            username: "abcd".into(),
            password: "secret".into(),
            reference_id: Some(AUTO_REFERENCE.into()),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_user_response_never_exposes_password() {
        let user = User {
            username: "registrar".into(),
            password: "$2b$12$hash".into(),
            role: "ADMIN".into(),
            reference_id: None,
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();

        assert!(json.contains(r#""role":"ADMIN""#));
        assert!(!json.contains("hash"));
    }
}
