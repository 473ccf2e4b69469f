//! # Campus Core
//!
//! Core types, errors, and utilities for the Campus Records API.
//!
//! - [`errors`]: application error type with HTTP response conversion
//! - [`pagination`]: pagination parameters and response metadata
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use campus_core::errors::AppError;
//! use campus_core::password::hash_password;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod pagination;
pub mod password;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
