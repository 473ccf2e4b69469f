//! Extractors for authentication and role checks.
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] verifies the JWT and exposes its claims
//! 3. Role extractors such as [`auth::RequireAdmin`] reject other roles with 403
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireAdmin};
//!
//! async fn me(auth_user: AuthUser) -> impl IntoResponse { /* any valid token */ }
//!
//! async fn create_course(RequireAdmin(auth_user): RequireAdmin) -> impl IntoResponse {
//!     // Only executes for ADMIN
//! }
//! ```

pub mod auth;
