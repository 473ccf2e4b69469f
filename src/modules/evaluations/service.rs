use anyhow::anyhow;
use campus_core::{PaginationMeta, PaginationParams};
use campus_records::{EntityKind, IdAllocator};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::evaluations::model::{
    CreateEvaluationDto, Evaluation, PaginatedEvaluationsResponse, UpdateEvaluationDto,
};
use crate::modules::identifiers::service::IdentifierService;
use crate::utils::errors::{AppError, write_error};

const EVALUATION_COLUMNS: &str = "id, course_code, realization_date";

pub struct EvaluationService;

impl EvaluationService {
    #[instrument(skip(db, allocator))]
    pub async fn create_evaluation(
        db: &PgPool,
        allocator: &IdAllocator,
        dto: CreateEvaluationDto,
    ) -> Result<Evaluation, AppError> {
        let id =
            IdentifierService::key_or_allocate(db, allocator, EntityKind::Evaluation, dto.id)
                .await?;

        sqlx::query_as::<_, Evaluation>(&format!(
            r#"INSERT INTO evaluations (id, course_code, realization_date)
               VALUES ($1, $2, $3)
               RETURNING {EVALUATION_COLUMNS}"#
        ))
        .bind(&id)
        .bind(&dto.course_code)
        .bind(dto.realization_date)
        .fetch_one(db)
        .await
        .map_err(|e| {
            write_error(
                e,
                &format!("Evaluation {id} already exists"),
                &format!("Course {} not found", dto.course_code),
            )
        })
    }

    #[instrument(skip(db))]
    pub async fn get_evaluations(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedEvaluationsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM evaluations")
            .fetch_one(db)
            .await?;

        let evaluations = sqlx::query_as::<_, Evaluation>(&format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluations ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedEvaluationsResponse {
            data: evaluations,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_evaluations_by_course(
        db: &PgPool,
        course_code: &str,
    ) -> Result<Vec<Evaluation>, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM courses WHERE code = $1)")
                .bind(course_code)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Course {course_code} not found")));
        }

        let evaluations = sqlx::query_as::<_, Evaluation>(&format!(
            r#"SELECT {EVALUATION_COLUMNS} FROM evaluations
               WHERE course_code = $1
               ORDER BY realization_date, id"#
        ))
        .bind(course_code)
        .fetch_all(db)
        .await?;

        Ok(evaluations)
    }

    #[instrument(skip(db))]
    pub async fn get_evaluation(db: &PgPool, id: &str) -> Result<Evaluation, AppError> {
        sqlx::query_as::<_, Evaluation>(&format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Evaluation {id} not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_evaluation(
        db: &PgPool,
        id: &str,
        dto: UpdateEvaluationDto,
    ) -> Result<Evaluation, AppError> {
        sqlx::query_as::<_, Evaluation>(&format!(
            "UPDATE evaluations SET realization_date = $2 WHERE id = $1 RETURNING {EVALUATION_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.realization_date)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Evaluation {id} not found")))
    }

    /// Grades recorded against the evaluation are deleted with it.
    #[instrument(skip(db))]
    pub async fn delete_evaluation(db: &PgPool, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM evaluations WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Evaluation {id} not found")));
        }

        Ok(())
    }
}
