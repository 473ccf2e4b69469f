use anyhow::anyhow;
use campus_core::{PaginationMeta, PaginationParams};
use campus_records::{
    Eligibility, EligibilityEvaluator, EntityKind, IdAllocator, PrerequisiteDepth, PrerequisiteGraph,
    PrerequisitePolicy, PrerequisiteRemoval, RecordStore, RecordsError,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::modules::courses::model::{
    Course, CourseDetail, CreateCourseDto, EligibilityResponse, PaginatedCoursesResponse,
    UpdateCourseDto,
};
use crate::modules::identifiers::service::IdentifierService;
use crate::store::PgRecordStore;
use crate::utils::errors::{AppError, delete_error, records_error, write_error};

const COURSE_COLUMNS: &str = "code, name, description, teacher_id";

pub struct CourseService;

impl CourseService {
    /// Inserts the course, then applies `prerequisite_codes` through the prerequisite graph.
    /// If any code is rejected the new course is removed again and the error returned.
    #[instrument(skip(db, allocator))]
    pub async fn create_course(
        db: &PgPool,
        allocator: &IdAllocator,
        policy: PrerequisitePolicy,
        dto: CreateCourseDto,
    ) -> Result<CourseDetail, AppError> {
        let code =
            IdentifierService::key_or_allocate(db, allocator, EntityKind::Course, dto.code).await?;

        sqlx::query(
            r#"INSERT INTO courses (code, name, description, teacher_id)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(&code)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.teacher_id)
        .execute(db)
        .await
        .map_err(|e| write_error(e, &format!("Course {code} already exists"), "Teacher not found"))?;

        let prerequisite_codes = dto.prerequisite_codes.unwrap_or_default();
        if prerequisite_codes.is_empty() {
            return Self::get_course(db, &code, false).await;
        }

        let store = PgRecordStore::new(db.clone());
        match PrerequisiteGraph::new(&store, policy)
            .add_prerequisites(&code, &prerequisite_codes)
            .await
        {
            Ok(course) => Ok(course.into()),
            Err(err) => {
                warn!(%code, error = %err, "Rolling back course creation");
                sqlx::query("DELETE FROM courses WHERE code = $1")
                    .bind(&code)
                    .execute(db)
                    .await?;
                Err(records_error(err))
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn get_courses(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(db)
            .await?;

        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY code LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedCoursesResponse {
            data: courses,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    /// Loads the course with its direct prerequisites, and theirs when `include_prerequisites`.
    #[instrument(skip(db))]
    pub async fn get_course(
        db: &PgPool,
        code: &str,
        include_prerequisites: bool,
    ) -> Result<CourseDetail, AppError> {
        let depth = if include_prerequisites {
            PrerequisiteDepth::Nested
        } else {
            PrerequisiteDepth::Direct
        };

        let course = PgRecordStore::new(db.clone())
            .find_course(code, depth)
            .await
            .map_err(|e| records_error(e.into()))?
            .ok_or_else(|| records_error(RecordsError::not_found(EntityKind::Course, code)))?;

        Ok(course.into())
    }

    /// Absent fields keep their stored value.
    #[instrument(skip(db))]
    pub async fn update_course(
        db: &PgPool,
        code: &str,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            r#"UPDATE courses
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   teacher_id = COALESCE($4, teacher_id)
               WHERE code = $1
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(code)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.teacher_id)
        .fetch_optional(db)
        .await
        .map_err(|e| write_error(e, "Duplicate course", "Teacher not found"))?
        .ok_or_else(|| AppError::not_found(anyhow!("Course {code} not found")))
    }

    /// Evaluations and prerequisite edges go with the course. Blocked while enrollments
    /// reference it.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, code: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE code = $1")
            .bind(code)
            .execute(db)
            .await
            .map_err(|e| {
                delete_error(e, &format!("Course {code} has enrollments and cannot be deleted"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Course {code} not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn add_prerequisites(
        db: &PgPool,
        policy: PrerequisitePolicy,
        code: &str,
        prerequisite_codes: &[String],
    ) -> Result<CourseDetail, AppError> {
        let store = PgRecordStore::new(db.clone());

        let course = PrerequisiteGraph::new(&store, policy)
            .add_prerequisites(code, prerequisite_codes)
            .await
            .map_err(records_error)?;

        Ok(course.into())
    }

    #[instrument(skip(db))]
    pub async fn remove_prerequisite(
        db: &PgPool,
        policy: PrerequisitePolicy,
        code: &str,
        prerequisite_code: &str,
    ) -> Result<PrerequisiteRemoval, AppError> {
        let store = PgRecordStore::new(db.clone());

        PrerequisiteGraph::new(&store, policy)
            .remove_prerequisite(code, prerequisite_code)
            .await
            .map_err(records_error)
    }

    /// Eligibility report for enrolling `student_id` in `code`; nothing is written.
    #[instrument(skip(db))]
    pub async fn check_eligibility(
        db: &PgPool,
        code: &str,
        student_id: &str,
    ) -> Result<EligibilityResponse, AppError> {
        let store = PgRecordStore::new(db.clone());
        let report = eligibility_report(&store, code, student_id)
            .await
            .map_err(records_error)?;

        info!(eligible = report.eligible, "Eligibility checked");
        Ok(EligibilityResponse::new(
            student_id.to_string(),
            code.to_string(),
            report,
        ))
    }
}

async fn eligibility_report<S>(
    store: &S,
    code: &str,
    student_id: &str,
) -> Result<Eligibility, RecordsError>
where
    S: RecordStore + ?Sized,
{
    store
        .find_student(student_id)
        .await?
        .ok_or_else(|| RecordsError::not_found(EntityKind::Student, student_id))?;

    let course = store
        .find_course(code, PrerequisiteDepth::Direct)
        .await?
        .ok_or_else(|| RecordsError::not_found(EntityKind::Course, code))?;

    EligibilityEvaluator::new(store)
        .check_prerequisites(student_id, &course)
        .await
}
