use campus_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A score on one evaluation. Independent of the enrollment's final grade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: i64,
    pub value: f64,
    pub student_id: String,
    pub evaluation_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGradeDto {
    #[validate(range(min = 0.0, max = 5.0))]
    pub value: f64,
    #[validate(length(min = 1))]
    pub student_id: String,
    #[validate(length(min = 1))]
    pub evaluation_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGradeDto {
    #[validate(range(min = 0.0, max = 5.0))]
    pub value: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedGradesResponse {
    pub data: Vec<Grade>,
    pub meta: PaginationMeta,
}
