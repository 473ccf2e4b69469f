use anyhow::anyhow;
use campus_core::{PaginationMeta, PaginationParams};
use campus_records::{EntityKind, IdAllocator};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::identifiers::service::IdentifierService;
use crate::modules::teachers::model::{
    CreateTeacherDto, PaginatedTeachersResponse, Teacher, UpdateTeacherDto,
};
use crate::utils::errors::{AppError, write_error};

const TEACHER_COLUMNS: &str = "id, name, hire_date, department_code";

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db, allocator))]
    pub async fn create_teacher(
        db: &PgPool,
        allocator: &IdAllocator,
        dto: CreateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let id = IdentifierService::allocate(db, allocator, EntityKind::Teacher.tag()).await?;

        sqlx::query_as::<_, Teacher>(&format!(
            r#"INSERT INTO teachers (id, name, hire_date, department_code)
               VALUES ($1, $2, $3, $4)
               RETURNING {TEACHER_COLUMNS}"#
        ))
        .bind(&id)
        .bind(&dto.name)
        .bind(dto.hire_date)
        .bind(&dto.department_code)
        .fetch_one(db)
        .await
        .map_err(|e| {
            write_error(
                e,
                &format!("Teacher {id} already exists"),
                "Department not found",
            )
        })
    }

    #[instrument(skip(db))]
    pub async fn get_teachers(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedTeachersResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teachers")
            .fetch_one(db)
            .await?;

        let teachers = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedTeachersResponse {
            data: teachers,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: &str) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Teacher {id} not found")))
    }

    /// Absent fields keep their stored value.
    #[instrument(skip(db))]
    pub async fn update_teacher(
        db: &PgPool,
        id: &str,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(&format!(
            r#"UPDATE teachers
               SET name = COALESCE($2, name),
                   hire_date = COALESCE($3, hire_date),
                   department_code = COALESCE($4, department_code)
               WHERE id = $1
               RETURNING {TEACHER_COLUMNS}"#
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(dto.hire_date)
        .bind(&dto.department_code)
        .fetch_optional(db)
        .await
        .map_err(|e| write_error(e, "Duplicate teacher", "Department not found"))?
        .ok_or_else(|| AppError::not_found(anyhow!("Teacher {id} not found")))
    }

    /// Courses taught by the teacher keep their rows with the reference cleared.
    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Teacher {id} not found")));
        }

        Ok(())
    }
}
