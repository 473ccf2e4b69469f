use anyhow::anyhow;
use campus_core::{PaginationMeta, PaginationParams};
use campus_records::{EnrollmentRequest, EnrollmentTransaction, RecordsError};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics;
use crate::modules::enrollments::model::{
    CreateEnrollmentDto, Enrollment, PaginatedEnrollmentsResponse, UpdateEnrollmentDto,
};
use crate::store::PgRecordStore;
use crate::utils::errors::{AppError, records_error};

const ENROLLMENT_COLUMNS: &str = "id, student_id, course_code, enrollment_date, final_grade";

/// Column an enrollment listing is narrowed by.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Student,
    Course,
}

impl Scope {
    fn column(self) -> &'static str {
        match self {
            Scope::Student => "student_id",
            Scope::Course => "course_code",
        }
    }

    fn parent(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Scope::Student => ("students", "id", "Student"),
            Scope::Course => ("courses", "code", "Course"),
        }
    }
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Runs the enrollment transaction: the student must have passed every direct
    /// prerequisite of the course. The new attempt starts ungraded.
    #[instrument(skip(db))]
    pub async fn create_enrollment(
        db: &PgPool,
        dto: CreateEnrollmentDto,
    ) -> Result<Enrollment, AppError> {
        let store = PgRecordStore::new(db.clone());
        let request = EnrollmentRequest {
            student_id: dto.student_id,
            course_code: dto.course_code,
            enrollment_date: dto
                .enrollment_date
                .unwrap_or_else(|| chrono::Utc::now().date_naive()),
        };

        match EnrollmentTransaction::execute(&store, request).await {
            Ok(enrollment) => {
                metrics::track_enrollment_created();
                Ok(enrollment.into())
            }
            Err(err) => {
                if matches!(err, RecordsError::PrerequisitesNotMet { .. }) {
                    metrics::track_enrollment_rejected();
                }
                Err(records_error(err))
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn get_enrollments(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedEnrollmentsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments")
            .fetch_one(db)
            .await?;

        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedEnrollmentsResponse {
            data: enrollments,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_enrollments_by_student(
        db: &PgPool,
        student_id: &str,
        pagination: PaginationParams,
    ) -> Result<PaginatedEnrollmentsResponse, AppError> {
        Self::get_scoped(db, Scope::Student, student_id, pagination).await
    }

    #[instrument(skip(db))]
    pub async fn get_enrollments_by_course(
        db: &PgPool,
        course_code: &str,
        pagination: PaginationParams,
    ) -> Result<PaginatedEnrollmentsResponse, AppError> {
        Self::get_scoped(db, Scope::Course, course_code, pagination).await
    }

    async fn get_scoped(
        db: &PgPool,
        scope: Scope,
        key: &str,
        pagination: PaginationParams,
    ) -> Result<PaginatedEnrollmentsResponse, AppError> {
        let (table, key_column, entity) = scope.parent();
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE {key_column} = $1)"
        ))
        .bind(key)
        .fetch_one(db)
        .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("{entity} {key} not found")));
        }

        let column = scope.column();
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM enrollments WHERE {column} = $1"
        ))
        .bind(key)
        .fetch_one(db)
        .await?;

        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            r#"SELECT {ENROLLMENT_COLUMNS} FROM enrollments
               WHERE {column} = $1
               ORDER BY enrollment_date, id
               LIMIT $2 OFFSET $3"#
        ))
        .bind(key)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedEnrollmentsResponse {
            data: enrollments,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_enrollment(db: &PgPool, id: i64) -> Result<Enrollment, AppError> {
        sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Enrollment {id} not found")))
    }

    /// Sets the final grade, or clears it when `final_grade` is null.
    #[instrument(skip(db))]
    pub async fn update_final_grade(
        db: &PgPool,
        id: i64,
        dto: UpdateEnrollmentDto,
    ) -> Result<Enrollment, AppError> {
        sqlx::query_as::<_, Enrollment>(&format!(
            "UPDATE enrollments SET final_grade = $2 WHERE id = $1 RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.final_grade)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Enrollment {id} not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_enrollment(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Enrollment {id} not found")));
        }

        Ok(())
    }
}
