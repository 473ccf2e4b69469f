//! Records the core reads and writes through a [`RecordStore`](crate::RecordStore).
//!
//! Thinner than the API models: a course carries only what the
//! eligibility rules and the prerequisite graph need.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::eligibility::is_passing_grade;

/// Entity types that own an identifier namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Department,
    Teacher,
    Course,
    Student,
    Evaluation,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Department,
        EntityKind::Teacher,
        EntityKind::Course,
        EntityKind::Student,
        EntityKind::Evaluation,
    ];

    /// Canonical tag used by the allocator and the API.
    pub const fn tag(self) -> &'static str {
        match self {
            EntityKind::Department => "department",
            EntityKind::Teacher => "teacher",
            EntityKind::Course => "course",
            EntityKind::Student => "student",
            EntityKind::Evaluation => "evaluation",
        }
    }

    /// Whether the entity is keyed by `code` rather than `id`.
    pub const fn keyed_by_code(self) -> bool {
        matches!(self, EntityKind::Department | EntityKind::Course)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Department => "Department",
            EntityKind::Teacher => "Teacher",
            EntityKind::Course => "Course",
            EntityKind::Student => "Student",
            EntityKind::Evaluation => "Evaluation",
        };
        f.write_str(label)
    }
}

impl FromStr for EntityKind {
    type Err = ();

    /// Accepts the English tags and the legacy Spanish ones, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "department" | "departamento" => Ok(EntityKind::Department),
            "teacher" | "profesor" => Ok(EntityKind::Teacher),
            "course" | "curso" => Ok(EntityKind::Course),
            "student" | "estudiante" => Ok(EntityKind::Student),
            "evaluation" | "evaluacion" => Ok(EntityKind::Evaluation),
            _ => Err(()),
        }
    }
}

/// How far prerequisite relations are expanded when a course is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrerequisiteDepth {
    /// Only the course's own prerequisites.
    #[default]
    Direct,
    /// Prerequisites plus their prerequisites. Display only.
    Nested,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub description: String,
    pub teacher_id: Option<String>,
    /// Ordered by course code. Entries carry their own prerequisites only when loaded
    /// with [`PrerequisiteDepth::Nested`].
    #[serde(default)]
    pub prerequisites: Vec<Course>,
}

impl Course {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            teacher_id: None,
            prerequisites: Vec::new(),
        }
    }

    pub fn requires(&self, code: &str) -> bool {
        self.prerequisites.iter().any(|p| p.code == code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
}

/// One enrollment attempt of a student in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: String,
    pub course_code: String,
    pub enrollment_date: NaiveDate,
    pub final_grade: Option<f64>,
}

impl Enrollment {
    pub fn is_passed(&self) -> bool {
        is_passing_grade(self.final_grade)
    }
}

/// An enrollment that has not been persisted yet. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEnrollment {
    pub student_id: String,
    pub course_code: String,
    pub enrollment_date: NaiveDate,
}
