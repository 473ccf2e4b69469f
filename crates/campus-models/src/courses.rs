//! Course models, including the prerequisite views.

use campus_core::PaginationMeta;
use campus_records::Eligibility;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    #[schema(example = "CUR-001")]
    pub code: String,
    pub name: String,
    pub description: String,
    pub teacher_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseSummary {
    pub code: String,
    pub name: String,
}

/// A direct prerequisite. `prerequisites` is filled only for the expanded view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrerequisiteInfo {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<CourseSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseDetail {
    pub code: String,
    pub name: String,
    pub description: String,
    pub teacher_id: Option<String>,
    pub prerequisites: Vec<PrerequisiteInfo>,
}

impl From<campus_records::Course> for CourseDetail {
    fn from(course: campus_records::Course) -> Self {
        let prerequisites = course
            .prerequisites
            .into_iter()
            .map(|prerequisite| PrerequisiteInfo {
                code: prerequisite.code,
                name: prerequisite.name,
                prerequisites: prerequisite
                    .prerequisites
                    .into_iter()
                    .map(|nested| CourseSummary {
                        code: nested.code,
                        name: nested.name,
                    })
                    .collect(),
            })
            .collect();

        Self {
            code: course.code,
            name: course.name,
            description: course.description,
            teacher_id: course.teacher_id,
            prerequisites,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseQueryParams {
    /// Also load the prerequisites of each prerequisite
    pub include_prerequisites: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    /// Allocated as `CUR-NNN` when omitted
    #[validate(length(min = 3, max = 10))]
    pub code: Option<String>,
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub teacher_id: Option<String>,
    /// Applied through the prerequisite graph after the course is created
    pub prerequisite_codes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub teacher_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddPrerequisitesDto {
    #[validate(length(min = 1))]
    pub prerequisite_codes: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub data: Vec<Course>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EligibilityResponse {
    pub student_id: String,
    pub course_code: String,
    pub eligible: bool,
    /// Names of unmet prerequisites
    pub missing: Vec<String>,
}

impl EligibilityResponse {
    pub fn new(student_id: String, course_code: String, eligibility: Eligibility) -> Self {
        Self {
            student_id,
            course_code,
            eligible: eligibility.eligible,
            missing: eligibility.missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_detail_from_nested_record() {
        let mut programming = campus_records::Course::new("CUR-002", "Programming II");
        programming
            .prerequisites
            .push(campus_records::Course::new("CUR-001", "Programming I"));

        let mut course = campus_records::Course::new("CUR-003", "Data Structures");
        course.prerequisites.push(programming);

        let detail = CourseDetail::from(course);

        assert_eq!(detail.prerequisites.len(), 1);
        assert_eq!(detail.prerequisites[0].name, "Programming II");
        assert_eq!(
            detail.prerequisites[0].prerequisites,
            vec![CourseSummary {
                code: "CUR-001".into(),
                name: "Programming I".into()
            }]
        );
    }

    #[test]
    fn test_create_course_code_length() {
        let dto = CreateCourseDto {
            code: Some("AB".into()),
            name: "Algebra".into(),
            description: String::new(),
            teacher_id: None,
            prerequisite_codes: None,
        };
        assert!(dto.validate().is_err());

        let allocated = CreateCourseDto { code: None, ..dto };
        assert!(allocated.validate().is_ok());
    }

    #[test]
    fn test_add_prerequisites_requires_codes() {
        let dto = AddPrerequisitesDto {
            prerequisite_codes: vec![],
        };
        assert!(dto.validate().is_err());
    }
}
