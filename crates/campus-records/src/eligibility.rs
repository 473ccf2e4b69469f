//! Pass/fail rules and prerequisite eligibility.
//!
//! Only the direct prerequisites of the target course are checked. Passing course B does not
//! require the student to have separately passed B's own prerequisites.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::RecordsError;
use crate::model::{Course, Enrollment};
use crate::store::RecordStore;

/// Lowest final grade that counts as a pass, inclusive.
pub const PASS_THRESHOLD: f64 = 3.0;

pub fn is_passing_grade(final_grade: Option<f64>) -> bool {
    final_grade.is_some_and(|grade| grade >= PASS_THRESHOLD)
}

/// True if any attempt has a passing final grade. Earlier failures do not count against it.
pub fn has_passing_attempt(attempts: &[Enrollment]) -> bool {
    attempts.iter().any(Enrollment::is_passed)
}

/// Outcome of a prerequisite check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub eligible: bool,
    /// Names of unmet prerequisites, in the course's prerequisite order.
    pub missing: Vec<String>,
}

impl Eligibility {
    pub fn from_missing(missing: Vec<String>) -> Self {
        Self {
            eligible: missing.is_empty(),
            missing,
        }
    }

    pub fn into_result(self) -> Result<(), RecordsError> {
        if self.eligible {
            Ok(())
        } else {
            Err(RecordsError::PrerequisitesNotMet {
                missing: self.missing,
            })
        }
    }
}

/// Evaluates eligibility from an already loaded enrollment history of one student.
pub fn evaluate(course: &Course, history: &[Enrollment]) -> Eligibility {
    let missing = course
        .prerequisites
        .iter()
        .filter(|prerequisite| {
            !history
                .iter()
                .any(|attempt| attempt.course_code == prerequisite.code && attempt.is_passed())
        })
        .map(|prerequisite| prerequisite.name.clone())
        .collect();

    Eligibility::from_missing(missing)
}

/// Store-backed eligibility checks.
pub struct EligibilityEvaluator<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> EligibilityEvaluator<'a, S>
where
    S: RecordStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn has_passed(&self, student_id: &str, course_code: &str) -> Result<bool, RecordsError> {
        let attempts = self.store.find_enrollments(student_id, course_code).await?;
        Ok(has_passing_attempt(&attempts))
    }

    /// Checks every direct prerequisite of `course`; all are evaluated so the full missing
    /// list can be reported.
    #[instrument(skip(self, course), fields(course = %course.code))]
    pub async fn check_prerequisites(
        &self,
        student_id: &str,
        course: &Course,
    ) -> Result<Eligibility, RecordsError> {
        let mut missing = Vec::new();

        for prerequisite in &course.prerequisites {
            if !self.has_passed(student_id, &prerequisite.code).await? {
                missing.push(prerequisite.name.clone());
            }
        }

        Ok(Eligibility::from_missing(missing))
    }
}
