pub mod auth;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod evaluations;
pub mod grades;
pub mod identifiers;
pub mod schedules;
pub mod students;
pub mod teachers;
