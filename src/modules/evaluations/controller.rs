use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::PaginationParams;
use tracing::instrument;

use crate::middleware::auth::{AuthUser, RequireStaff};
use crate::modules::evaluations::model::{
    CreateEvaluationDto, Evaluation, PaginatedEvaluationsResponse, UpdateEvaluationDto,
};
use crate::modules::evaluations::service::EvaluationService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/evaluations",
    request_body = CreateEvaluationDto,
    responses(
        (status = 201, description = "Evaluation created", body = Evaluation),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Id already in use")
    ),
    tag = "Evaluations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_evaluation(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateEvaluationDto>,
) -> Result<(StatusCode, Json<Evaluation>), AppError> {
    let evaluation = EvaluationService::create_evaluation(&state.db, &state.allocator, dto).await?;
    Ok((StatusCode::CREATED, Json(evaluation)))
}

#[utoipa::path(
    get,
    path = "/api/evaluations",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of evaluations", body = PaginatedEvaluationsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Evaluations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_evaluations(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedEvaluationsResponse>, AppError> {
    let evaluations = EvaluationService::get_evaluations(&state.db, pagination).await?;
    Ok(Json(evaluations))
}

#[utoipa::path(
    get,
    path = "/api/evaluations/{id}",
    params(("id" = String, Path, description = "Evaluation id")),
    responses(
        (status = 200, description = "Evaluation details", body = Evaluation),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Evaluation not found")
    ),
    tag = "Evaluations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_evaluation(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Evaluation>, AppError> {
    let evaluation = EvaluationService::get_evaluation(&state.db, &id).await?;
    Ok(Json(evaluation))
}

#[utoipa::path(
    put,
    path = "/api/evaluations/{id}",
    params(("id" = String, Path, description = "Evaluation id")),
    request_body = UpdateEvaluationDto,
    responses(
        (status = 200, description = "Evaluation rescheduled", body = Evaluation),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 404, description = "Evaluation not found")
    ),
    tag = "Evaluations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_evaluation(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateEvaluationDto>,
) -> Result<Json<Evaluation>, AppError> {
    let evaluation = EvaluationService::update_evaluation(&state.db, &id, dto).await?;
    Ok(Json(evaluation))
}

#[utoipa::path(
    delete,
    path = "/api/evaluations/{id}",
    params(("id" = String, Path, description = "Evaluation id")),
    responses(
        (status = 204, description = "Evaluation and its grades deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 404, description = "Evaluation not found")
    ),
    tag = "Evaluations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_evaluation(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    EvaluationService::delete_evaluation(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/evaluations/course/{course_code}",
    params(("course_code" = String, Path, description = "Course code")),
    responses(
        (status = 200, description = "Evaluations of the course by date", body = Vec<Evaluation>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found")
    ),
    tag = "Evaluations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_evaluations_by_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(course_code): Path<String>,
) -> Result<Json<Vec<Evaluation>>, AppError> {
    let evaluations = EvaluationService::get_evaluations_by_course(&state.db, &course_code).await?;
    Ok(Json(evaluations))
}
