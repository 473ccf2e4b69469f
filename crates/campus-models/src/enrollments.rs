use campus_core::PaginationMeta;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// One enrollment attempt. Several may exist for the same student and course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: String,
    pub course_code: String,
    pub enrollment_date: NaiveDate,
    /// 0.0-5.0, unset until graded
    pub final_grade: Option<f64>,
}

impl From<campus_records::Enrollment> for Enrollment {
    fn from(enrollment: campus_records::Enrollment) -> Self {
        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            course_code: enrollment.course_code,
            enrollment_date: enrollment.enrollment_date,
            final_grade: enrollment.final_grade,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEnrollmentDto {
    #[validate(length(min = 1))]
    pub student_id: String,
    #[validate(length(min = 1))]
    pub course_code: String,
    /// Defaults to today
    pub enrollment_date: Option<NaiveDate>,
}

/// Sets or clears (`null`) the final grade. The field itself is required.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEnrollmentDto {
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    #[schema(required = true)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub final_grade: Option<f64>,
}

// A `deserialize_with` field gets no implicit default, so `{}` fails as a missing field.
fn deserialize_nullable_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedEnrollmentsResponse {
    pub data: Vec<Enrollment>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_grade_range() {
        assert!(UpdateEnrollmentDto { final_grade: Some(5.0) }.validate().is_ok());
        assert!(UpdateEnrollmentDto { final_grade: None }.validate().is_ok());
        assert!(UpdateEnrollmentDto { final_grade: Some(5.1) }.validate().is_err());
        assert!(UpdateEnrollmentDto { final_grade: Some(-0.5) }.validate().is_err());
    }

    #[test]
    fn test_final_grade_must_be_present() {
        let cleared: UpdateEnrollmentDto =
            serde_json::from_value(serde_json::json!({ "final_grade": null })).unwrap();
        assert_eq!(cleared.final_grade, None);

        let set: UpdateEnrollmentDto =
            serde_json::from_value(serde_json::json!({ "final_grade": 3.5 })).unwrap();
        assert_eq!(set.final_grade, Some(3.5));

        let missing = serde_json::from_value::<UpdateEnrollmentDto>(serde_json::json!({}));
        assert!(missing.unwrap_err().to_string().contains("missing field `final_grade`"));
    }
}
