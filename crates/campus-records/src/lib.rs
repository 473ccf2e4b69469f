//! Campus Records core.
//!
//! Prerequisite graph, eligibility rules, the enrollment transaction and the sequential
//! identifier allocator. Persistence is reached only through [`RecordStore`]; the API crate
//! provides a PostgreSQL implementation and [`memory::MemoryStore`] serves tests.

pub mod allocator;
pub mod eligibility;
pub mod enrollment;
pub mod error;
pub mod memory;
pub mod model;
pub mod prerequisites;
pub mod store;

pub use allocator::{IdAllocator, Namespace, PrefixTable, format_identifier, parse_sequence};
pub use eligibility::{Eligibility, EligibilityEvaluator, PASS_THRESHOLD, evaluate};
pub use enrollment::{EnrollmentRequest, EnrollmentTransaction, enroll};
pub use error::RecordsError;
pub use memory::MemoryStore;
pub use model::{Course, EntityKind, Enrollment, NewEnrollment, PrerequisiteDepth, Student};
pub use prerequisites::{
    PrerequisiteChange, PrerequisiteGraph, PrerequisitePolicy, PrerequisiteRemoval,
};
pub use store::{EdgeInsert, RecordStore, StoreError};
