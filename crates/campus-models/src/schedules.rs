use campus_core::PaginationMeta;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A weekly lecture slot of a course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Schedule {
    pub id: i64,
    #[schema(example = "Monday")]
    pub day: String,
    #[schema(value_type = String, example = "08:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
    pub course_code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateScheduleDto {
    #[validate(length(min = 1, max = 20))]
    pub day: String,
    #[schema(value_type = String, example = "08:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
    #[validate(length(min = 1))]
    pub course_code: String,
}

/// Absent fields keep their stored value. The course cannot be changed.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateScheduleDto {
    #[validate(length(min = 1, max = 20))]
    pub day: Option<String>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedSchedulesResponse {
    pub data: Vec<Schedule>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_schedule_parses_times() {
        let dto: CreateScheduleDto = serde_json::from_str(
            r#"{"day":"Monday","start_time":"08:00:00","end_time":"09:30:00","course_code":"CUR-001"}"#,
        )
        .unwrap();

        assert!(dto.validate().is_ok());
        assert_eq!(dto.end_time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn test_blank_day_is_invalid() {
        let dto = CreateScheduleDto {
            day: String::new(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            course_code: "CUR-001".into(),
        };

        assert!(dto.validate().is_err());
    }
}
