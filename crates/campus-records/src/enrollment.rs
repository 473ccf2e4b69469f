//! Enrollment of a student in a course, gated on prerequisites.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::eligibility::EligibilityEvaluator;
use crate::error::RecordsError;
use crate::model::{EntityKind, Enrollment, NewEnrollment, PrerequisiteDepth};
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub student_id: String,
    pub course_code: String,
    pub enrollment_date: NaiveDate,
}

pub struct EnrollmentTransaction;

impl EnrollmentTransaction {
    /// Loads the student and the course, checks the course's direct prerequisites against the
    /// student's history, then saves a new ungraded enrollment. Nothing is written when the
    /// student is ineligible.
    #[instrument(skip(store), fields(student = %request.student_id, course = %request.course_code))]
    pub async fn execute<S>(store: &S, request: EnrollmentRequest) -> Result<Enrollment, RecordsError>
    where
        S: RecordStore + ?Sized,
    {
        store
            .find_student(&request.student_id)
            .await?
            .ok_or_else(|| RecordsError::not_found(EntityKind::Student, &request.student_id))?;

        let course = store
            .find_course(&request.course_code, PrerequisiteDepth::Direct)
            .await?
            .ok_or_else(|| RecordsError::not_found(EntityKind::Course, &request.course_code))?;

        let eligibility = EligibilityEvaluator::new(store)
            .check_prerequisites(&request.student_id, &course)
            .await?;

        if !eligibility.eligible {
            info!(missing = ?eligibility.missing, "Enrollment rejected");
        }
        eligibility.into_result()?;

        let enrollment = store
            .save_enrollment(NewEnrollment {
                student_id: request.student_id,
                course_code: request.course_code,
                enrollment_date: request.enrollment_date,
            })
            .await?;

        info!(enrollment_id = enrollment.id, "Enrollment created");
        Ok(enrollment)
    }
}

/// Enrolls `student_id` in `course_code` on `date`.
pub async fn enroll<S>(
    store: &S,
    student_id: &str,
    course_code: &str,
    date: NaiveDate,
) -> Result<Enrollment, RecordsError>
where
    S: RecordStore + ?Sized,
{
    EnrollmentTransaction::execute(
        store,
        EnrollmentRequest {
            student_id: student_id.to_string(),
            course_code: course_code.to_string(),
            enrollment_date: date,
        },
    )
    .await
}
