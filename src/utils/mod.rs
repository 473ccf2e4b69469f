//! Utility modules for the Campus Records API.
//!
//! - [`errors`]: mapping of domain and database errors onto [`AppError`](errors::AppError)

pub mod errors;
