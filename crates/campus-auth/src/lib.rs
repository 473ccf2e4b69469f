//! # Campus Auth
//!
//! Session identity for the Campus Records API.
//!
//! - [`claims`]: access token claims and the [`Role`] a user acts under
//! - [`jwt`]: token creation and verification
//!
//! ```ignore
//! use campus_auth::{Role, create_access_token, verify_token};
//!
//! let token = create_access_token("registrar", Role::Admin, None, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::{Claims, Role};
pub use jwt::{create_access_token, verify_token};
