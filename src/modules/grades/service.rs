use anyhow::anyhow;
use campus_core::{PaginationMeta, PaginationParams};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::grades::model::{CreateGradeDto, Grade, PaginatedGradesResponse, UpdateGradeDto};
use crate::utils::errors::{AppError, write_error};

const GRADE_COLUMNS: &str = "id, value, student_id, evaluation_id";

pub struct GradeService;

impl GradeService {
    #[instrument(skip(db))]
    pub async fn create_grade(db: &PgPool, dto: CreateGradeDto) -> Result<Grade, AppError> {
        sqlx::query_as::<_, Grade>(&format!(
            r#"INSERT INTO grades (value, student_id, evaluation_id)
               VALUES ($1, $2, $3)
               RETURNING {GRADE_COLUMNS}"#
        ))
        .bind(dto.value)
        .bind(&dto.student_id)
        .bind(&dto.evaluation_id)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, "Duplicate grade", "Student or evaluation not found"))
    }

    #[instrument(skip(db))]
    pub async fn get_grades(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedGradesResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM grades")
            .fetch_one(db)
            .await?;

        let grades = sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedGradesResponse {
            data: grades,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_grades_by_student(
        db: &PgPool,
        student_id: &str,
    ) -> Result<Vec<Grade>, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(student_id)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Student {student_id} not found")));
        }

        let grades = sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades WHERE student_id = $1 ORDER BY id"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(grades)
    }

    #[instrument(skip(db))]
    pub async fn get_grades_by_evaluation(
        db: &PgPool,
        evaluation_id: &str,
    ) -> Result<Vec<Grade>, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM evaluations WHERE id = $1)")
                .bind(evaluation_id)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Evaluation {evaluation_id} not found")));
        }

        let grades = sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades WHERE evaluation_id = $1 ORDER BY student_id, id"
        ))
        .bind(evaluation_id)
        .fetch_all(db)
        .await?;

        Ok(grades)
    }

    #[instrument(skip(db))]
    pub async fn get_grade(db: &PgPool, id: i64) -> Result<Grade, AppError> {
        sqlx::query_as::<_, Grade>(&format!("SELECT {GRADE_COLUMNS} FROM grades WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Grade {id} not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_grade(db: &PgPool, id: i64, dto: UpdateGradeDto) -> Result<Grade, AppError> {
        sqlx::query_as::<_, Grade>(&format!(
            "UPDATE grades SET value = $2 WHERE id = $1 RETURNING {GRADE_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.value)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Grade {id} not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_grade(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Grade {id} not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn seed(pool: &PgPool) {
        sqlx::query("INSERT INTO courses (code, name) VALUES ('CUR-001', 'Calculus I')")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO students (id, name) VALUES ('EST-001', 'Ana Torres')")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            r#"INSERT INTO evaluations (id, course_code, realization_date)
               VALUES ('EVAL-001', 'CUR-001', '2024-05-02')"#,
        )
        .execute(pool)
        .await
        .unwrap();
    }

    fn dto(value: f64, evaluation_id: &str) -> CreateGradeDto {
        CreateGradeDto {
            value,
            student_id: "EST-001".into(),
            evaluation_id: evaluation_id.into(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_grade_lifecycle(pool: PgPool) {
        seed(&pool).await;

        let grade = GradeService::create_grade(&pool, dto(4.2, "EVAL-001")).await.unwrap();
        let updated = GradeService::update_grade(&pool, grade.id, UpdateGradeDto { value: 4.6 })
            .await
            .unwrap();
        assert_eq!(updated.value, 4.6);

        let by_student = GradeService::get_grades_by_student(&pool, "EST-001").await.unwrap();
        assert_eq!(by_student.len(), 1);

        GradeService::delete_grade(&pool, grade.id).await.unwrap();
        let err = GradeService::get_grade(&pool, grade.id).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_dangling_evaluation_is_not_found(pool: PgPool) {
        seed(&pool).await;

        let err = GradeService::create_grade(&pool, dto(3.0, "EVAL-404")).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_deleting_evaluation_removes_grades(pool: PgPool) {
        seed(&pool).await;
        GradeService::create_grade(&pool, dto(3.0, "EVAL-001")).await.unwrap();

        sqlx::query("DELETE FROM evaluations WHERE id = 'EVAL-001'")
            .execute(&pool)
            .await
            .unwrap();

        let grades = GradeService::get_grades_by_student(&pool, "EST-001").await.unwrap();
        assert!(grades.is_empty());
    }
}
