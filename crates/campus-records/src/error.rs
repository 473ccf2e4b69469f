//! Error types for enrollment and identifier operations.

use crate::model::EntityKind;
use crate::store::StoreError;

/// Errors returned by the records core.
///
/// None of these are retried by the core; retrying is the caller's decision.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    /// A referenced student or course does not exist.
    #[error("{entity} {key} not found")]
    NotFound { entity: EntityKind, key: String },

    /// The student has not passed every direct prerequisite. `missing` holds course names.
    #[error(
        "Student does not meet the course prerequisites. Missing prerequisites: {}",
        .missing.join(", ")
    )]
    PrerequisitesNotMet { missing: Vec<String> },

    /// A course was proposed as its own prerequisite.
    #[error("Course {0} cannot be its own prerequisite")]
    SelfPrerequisite(String),

    /// The proposed edge would close a cycle in the prerequisite graph.
    #[error("Adding {prerequisite} as a prerequisite of {course} would create a cycle")]
    CyclicPrerequisite { course: String, prerequisite: String },

    /// The entity-type tag has no letters to derive a prefix from.
    #[error("Entity type {0:?} cannot be used as an identifier namespace")]
    InvalidEntityTag(String),

    /// The record store failed. Never downgraded into a default value.
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

impl RecordsError {
    pub fn not_found(entity: EntityKind, key: impl Into<String>) -> Self {
        RecordsError::NotFound {
            entity,
            key: key.into(),
        }
    }
}
