use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use campus_auth::{Claims, Role, verify_token};

use crate::state::AppState;
use crate::utils::errors::AppError;

/// Extractor that validates the bearer token and provides the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.0.sub
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.0.has_any_role(roles)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Creates an extractor that admits only the listed roles.
#[macro_export]
macro_rules! require_role {
    ($name:ident, [$($role:expr),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = $crate::utils::errors::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                let allowed = [$($role),+];
                if !auth_user.has_any_role(&allowed) {
                    let names: Vec<&str> = allowed.iter().map(|role| role.as_str()).collect();
                    return Err($crate::utils::errors::AppError::forbidden(format!(
                        "Access denied. Required role: {}",
                        names.join(" or ")
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

// Catalog and enrollment writes
require_role!(RequireAdmin, [Role::Admin]);

// Evaluations, grades and final grades
require_role!(RequireStaff, [Role::Admin, Role::Teacher]);

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(role: Role) -> AuthUser {
        AuthUser(Claims {
            sub: "registrar".to_string(),
            role,
            reference_id: None,
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_has_any_role() {
        let teacher = auth_user(Role::Teacher);

        assert!(teacher.has_any_role(&[Role::Admin, Role::Teacher]));
        assert!(!teacher.has_any_role(&[Role::Admin]));
    }

    #[test]
    fn test_accessors() {
        let admin = auth_user(Role::Admin);

        assert_eq!(admin.username(), "registrar");
        assert_eq!(admin.role(), Role::Admin);
    }
}
