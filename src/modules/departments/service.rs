use anyhow::anyhow;
use campus_core::{PaginationMeta, PaginationParams};
use campus_records::{EntityKind, IdAllocator};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::departments::model::{
    CreateDepartmentDto, Department, PaginatedDepartmentsResponse, UpdateDepartmentDto,
};
use crate::modules::identifiers::service::IdentifierService;
use crate::utils::errors::{AppError, write_error};

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(db, allocator))]
    pub async fn create_department(
        db: &PgPool,
        allocator: &IdAllocator,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        let code =
            IdentifierService::key_or_allocate(db, allocator, EntityKind::Department, dto.code)
                .await?;

        sqlx::query_as::<_, Department>(
            "INSERT INTO departments (code, name) VALUES ($1, $2) RETURNING code, name",
        )
        .bind(&code)
        .bind(&dto.name)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, &format!("Department {code} already exists"), "Invalid reference"))
    }

    #[instrument(skip(db))]
    pub async fn get_departments(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedDepartmentsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM departments")
            .fetch_one(db)
            .await?;

        let departments = sqlx::query_as::<_, Department>(
            "SELECT code, name FROM departments ORDER BY code LIMIT $1 OFFSET $2",
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedDepartmentsResponse {
            data: departments,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_department(db: &PgPool, code: &str) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>("SELECT code, name FROM departments WHERE code = $1")
            .bind(code)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Department {code} not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_department(
        db: &PgPool,
        code: &str,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            "UPDATE departments SET name = $2 WHERE code = $1 RETURNING code, name",
        )
        .bind(code)
        .bind(&dto.name)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Department {code} not found")))
    }

    /// Teachers of the department keep their rows with the reference cleared.
    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, code: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE code = $1")
            .bind(code)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Department {code} not found")));
        }

        Ok(())
    }
}
