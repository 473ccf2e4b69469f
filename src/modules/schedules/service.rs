use anyhow::anyhow;
use campus_core::{PaginationMeta, PaginationParams};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::schedules::model::{
    CreateScheduleDto, PaginatedSchedulesResponse, Schedule, UpdateScheduleDto,
};
use crate::utils::errors::{AppError, is_check_violation, write_error};

const SCHEDULE_COLUMNS: &str = "id, day, start_time, end_time, course_code";

const TIME_ORDER_MESSAGE: &str = "start_time must be before end_time";

/// Slots are stored as given; overlapping slots are not detected.
pub struct ScheduleService;

impl ScheduleService {
    #[instrument(skip(db))]
    pub async fn create_schedule(
        db: &PgPool,
        dto: CreateScheduleDto,
    ) -> Result<Schedule, AppError> {
        sqlx::query_as::<_, Schedule>(&format!(
            r#"INSERT INTO schedules (day, start_time, end_time, course_code)
               VALUES ($1, $2, $3, $4)
               RETURNING {SCHEDULE_COLUMNS}"#
        ))
        .bind(&dto.day)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(&dto.course_code)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_check_violation(&e) {
                return AppError::unprocessable(anyhow!(TIME_ORDER_MESSAGE));
            }
            write_error(
                e,
                "Duplicate schedule",
                &format!("Course {} not found", dto.course_code),
            )
        })
    }

    #[instrument(skip(db))]
    pub async fn get_schedules(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedSchedulesResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM schedules")
            .fetch_one(db)
            .await?;

        let schedules = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedSchedulesResponse {
            data: schedules,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_schedules_by_course(
        db: &PgPool,
        course_code: &str,
    ) -> Result<Vec<Schedule>, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM courses WHERE code = $1)")
                .bind(course_code)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Course {course_code} not found")));
        }

        let schedules = sqlx::query_as::<_, Schedule>(&format!(
            r#"SELECT {SCHEDULE_COLUMNS} FROM schedules
               WHERE course_code = $1
               ORDER BY id"#
        ))
        .bind(course_code)
        .fetch_all(db)
        .await?;

        Ok(schedules)
    }

    #[instrument(skip(db))]
    pub async fn get_schedule(db: &PgPool, id: i64) -> Result<Schedule, AppError> {
        sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Schedule {id} not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_schedule(
        db: &PgPool,
        id: i64,
        dto: UpdateScheduleDto,
    ) -> Result<Schedule, AppError> {
        sqlx::query_as::<_, Schedule>(&format!(
            r#"UPDATE schedules
               SET day = COALESCE($2, day),
                   start_time = COALESCE($3, start_time),
                   end_time = COALESCE($4, end_time)
               WHERE id = $1
               RETURNING {SCHEDULE_COLUMNS}"#
        ))
        .bind(id)
        .bind(&dto.day)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if is_check_violation(&e) {
                return AppError::unprocessable(anyhow!(TIME_ORDER_MESSAGE));
            }
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow!("Schedule {id} not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_schedule(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Schedule {id} not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::NaiveTime;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn dto(day: &str, start: NaiveTime, end: NaiveTime) -> CreateScheduleDto {
        CreateScheduleDto {
            day: day.to_string(),
            start_time: start,
            end_time: end,
            course_code: "CUR-001".to_string(),
        }
    }

    async fn seed_course(pool: &PgPool) {
        sqlx::query("INSERT INTO courses (code, name) VALUES ('CUR-001', 'Calculus I')")
            .execute(pool)
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_overlapping_slots_are_both_stored(pool: PgPool) {
        seed_course(&pool).await;

        ScheduleService::create_schedule(&pool, dto("Monday", at(8, 0), at(10, 0)))
            .await
            .unwrap();
        ScheduleService::create_schedule(&pool, dto("Monday", at(9, 0), at(11, 0)))
            .await
            .unwrap();

        let listed = ScheduleService::get_schedules_by_course(&pool, "CUR-001")
            .await
            .unwrap();
        let starts: Vec<NaiveTime> = listed.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, [at(8, 0), at(9, 0)]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_end_before_start_is_unprocessable(pool: PgPool) {
        seed_course(&pool).await;

        let err = ScheduleService::create_schedule(&pool, dto("Tuesday", at(10, 0), at(9, 0)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let slot = ScheduleService::create_schedule(&pool, dto("Tuesday", at(9, 0), at(10, 0)))
            .await
            .unwrap();
        let err = ScheduleService::update_schedule(
            &pool,
            slot.id,
            UpdateScheduleDto {
                day: None,
                start_time: Some(at(11, 0)),
                end_time: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_keeps_absent_fields(pool: PgPool) {
        seed_course(&pool).await;
        let slot = ScheduleService::create_schedule(&pool, dto("Monday", at(8, 0), at(10, 0)))
            .await
            .unwrap();

        let updated = ScheduleService::update_schedule(
            &pool,
            slot.id,
            UpdateScheduleDto {
                day: Some("Friday".into()),
                start_time: None,
                end_time: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.day, "Friday");
        assert_eq!(updated.start_time, at(8, 0));
        assert_eq!(updated.end_time, at(10, 0));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_course(pool: PgPool) {
        let err = ScheduleService::create_schedule(&pool, dto("Monday", at(8, 0), at(10, 0)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.error.to_string(), "Course CUR-001 not found");

        let err = ScheduleService::get_schedules_by_course(&pool, "CUR-001")
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_deleted_with_course(pool: PgPool) {
        seed_course(&pool).await;
        let slot = ScheduleService::create_schedule(&pool, dto("Monday", at(8, 0), at(10, 0)))
            .await
            .unwrap();

        sqlx::query("DELETE FROM courses WHERE code = 'CUR-001'")
            .execute(&pool)
            .await
            .unwrap();

        let err = ScheduleService::get_schedule(&pool, slot.id).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
