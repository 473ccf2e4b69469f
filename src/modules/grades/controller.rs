use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::PaginationParams;
use tracing::instrument;

use crate::middleware::auth::{AuthUser, RequireStaff};
use crate::modules::grades::model::{CreateGradeDto, Grade, PaginatedGradesResponse, UpdateGradeDto};
use crate::modules::grades::service::GradeService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade recorded", body = Grade),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 404, description = "Student or evaluation not found"),
        (status = 422, description = "Value outside 0.0-5.0")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_grade(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    let grade = GradeService::create_grade(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

#[utoipa::path(
    get,
    path = "/api/grades",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of grades", body = PaginatedGradesResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_grades(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedGradesResponse>, AppError> {
    let grades = GradeService::get_grades(&state.db, pagination).await?;
    Ok(Json(grades))
}

#[utoipa::path(
    get,
    path = "/api/grades/{id}",
    params(("id" = i64, Path, description = "Grade id")),
    responses(
        (status = 200, description = "Grade details", body = Grade),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Grade not found")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_grade(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Grade>, AppError> {
    let grade = GradeService::get_grade(&state.db, id).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    put,
    path = "/api/grades/{id}",
    params(("id" = i64, Path, description = "Grade id")),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Grade updated", body = Grade),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 404, description = "Grade not found")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_grade(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateGradeDto>,
) -> Result<Json<Grade>, AppError> {
    let grade = GradeService::update_grade(&state.db, id, dto).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    delete,
    path = "/api/grades/{id}",
    params(("id" = i64, Path, description = "Grade id")),
    responses(
        (status = 204, description = "Grade deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 404, description = "Grade not found")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_grade(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    GradeService::delete_grade(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/grades/student/{student_id}",
    params(("student_id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Grades of the student", body = Vec<Grade>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_grades_by_student(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<Grade>>, AppError> {
    let grades = GradeService::get_grades_by_student(&state.db, &student_id).await?;
    Ok(Json(grades))
}

#[utoipa::path(
    get,
    path = "/api/grades/evaluation/{evaluation_id}",
    params(("evaluation_id" = String, Path, description = "Evaluation id")),
    responses(
        (status = 200, description = "Grades recorded for the evaluation", body = Vec<Grade>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Evaluation not found")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_grades_by_evaluation(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(evaluation_id): Path<String>,
) -> Result<Json<Vec<Grade>>, AppError> {
    let grades = GradeService::get_grades_by_evaluation(&state.db, &evaluation_id).await?;
    Ok(Json(grades))
}
