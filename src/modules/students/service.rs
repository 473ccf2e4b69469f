use anyhow::anyhow;
use campus_core::{PaginationMeta, PaginationParams};
use campus_records::{EntityKind, IdAllocator};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::identifiers::service::IdentifierService;
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, UpdateStudentDto,
};
use crate::utils::errors::{AppError, delete_error, write_error};

const STUDENT_COLUMNS: &str = "id, name, birth_date";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, allocator))]
    pub async fn create_student(
        db: &PgPool,
        allocator: &IdAllocator,
        dto: CreateStudentDto,
    ) -> Result<Student, AppError> {
        let id =
            IdentifierService::key_or_allocate(db, allocator, EntityKind::Student, dto.id).await?;

        sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students (id, name, birth_date)
               VALUES ($1, $2, $3)
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(&id)
        .bind(&dto.name)
        .bind(dto.birth_date)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, &format!("Student {id} already exists"), "Invalid reference"))
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(db)
            .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: &str) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student {id} not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_student(
        db: &PgPool,
        id: &str,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            r#"UPDATE students
               SET name = COALESCE($2, name),
                   birth_date = COALESCE($3, birth_date)
               WHERE id = $1
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(dto.birth_date)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student {id} not found")))
    }

    /// Blocked while enrollments or grades reference the student.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                delete_error(
                    e,
                    &format!("Student {id} has enrollments or grades and cannot be deleted"),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student {id} not found")));
        }

        Ok(())
    }
}
