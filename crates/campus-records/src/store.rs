//! The storage seam between the records core and a persistence backend.

use async_trait::async_trait;

use crate::allocator::Namespace;
use crate::model::{Course, Enrollment, NewEnrollment, PrerequisiteDepth, Student};

/// Failure reported by a [`RecordStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("record store query failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable(message.into())
    }

    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }
}

/// Outcome of [`RecordStore::insert_prerequisite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    Added,
    AlreadyPresent,
    /// The prerequisite already reaches the course, so the edge would close a cycle.
    WouldCycle,
}

/// Keyed storage for the records the core operates on.
///
/// Implementations provide their own atomicity. The core performs each call as a single
/// request/response and holds no locks across calls.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Loads a course with its direct prerequisites, ordered by code.
    async fn find_course(
        &self,
        code: &str,
        depth: PrerequisiteDepth,
    ) -> Result<Option<Course>, StoreError>;

    /// Codes of the direct prerequisites of `course_code`. Empty when the course is absent.
    async fn prerequisite_codes(&self, course_code: &str) -> Result<Vec<String>, StoreError>;

    async fn find_student(&self, id: &str) -> Result<Option<Student>, StoreError>;

    /// Every enrollment attempt of the student in the course, oldest first.
    async fn find_enrollments(
        &self,
        student_id: &str,
        course_code: &str,
    ) -> Result<Vec<Enrollment>, StoreError>;

    async fn save_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment, StoreError>;

    /// Adds the edge `course_code -> prerequisite_code`.
    ///
    /// With `reject_cycles`, the reachability check and the insert must be atomic with respect
    /// to every other edge insert, so two requests closing the same cycle cannot both succeed.
    async fn insert_prerequisite(
        &self,
        course_code: &str,
        prerequisite_code: &str,
        reject_cycles: bool,
    ) -> Result<EdgeInsert, StoreError>;

    /// Removes the edge. Returns false if it was not present.
    async fn delete_prerequisite(
        &self,
        course_code: &str,
        prerequisite_code: &str,
    ) -> Result<bool, StoreError>;

    /// Atomically advances the namespace counter and returns the new value.
    ///
    /// The counter must never return a value at or below the largest numeric suffix of an
    /// existing identifier in the namespace, so records created with client-supplied keys
    /// are not reissued.
    async fn next_sequence(&self, namespace: &Namespace) -> Result<u64, StoreError>;
}
