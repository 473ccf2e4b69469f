//! # Campus Records API
//!
//! A REST API built with Rust, Axum, and PostgreSQL for managing academic records:
//! departments, teachers, courses and their prerequisites, students, enrollments,
//! evaluations, grades and lecture schedules.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── config/       # Configuration re-exports
//! ├── middleware/   # JWT extractor and role guards
//! ├── modules/      # Feature modules (controller, service, router, model)
//! ├── utils/        # Error mapping helpers
//! ├── store.rs      # PostgreSQL implementation of the records store
//! └── router.rs     # Main application router
//! ```
//!
//! Enrollment eligibility, the prerequisite graph and identifier allocation live in the
//! `campus-records` crate and reach the database only through [`store::PgRecordStore`].
//!
//! ## Roles
//!
//! | Role | Reads | Writes |
//! |------|-------|--------|
//! | ADMIN | all | all |
//! | TEACHER | all | evaluations, grades, final grades |
//! | STUDENT | all | none |
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod config;
pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod store;
pub mod utils;
pub mod validator;

pub use campus_auth;
pub use campus_config;
pub use campus_core;
pub use campus_db;
pub use campus_records;
