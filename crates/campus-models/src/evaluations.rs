use campus_core::PaginationMeta;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Evaluation {
    #[schema(example = "EVAL-001")]
    pub id: String,
    pub course_code: String,
    pub realization_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEvaluationDto {
    /// Allocated as `EVAL-NNN` when omitted
    #[validate(length(min = 5, max = 20))]
    pub id: Option<String>,
    #[validate(length(min = 1))]
    pub course_code: String,
    pub realization_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEvaluationDto {
    pub realization_date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedEvaluationsResponse {
    pub data: Vec<Evaluation>,
    pub meta: PaginationMeta,
}
