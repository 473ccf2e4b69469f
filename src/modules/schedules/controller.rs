use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::PaginationParams;
use tracing::instrument;

use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::modules::schedules::model::{
    CreateScheduleDto, PaginatedSchedulesResponse, Schedule, UpdateScheduleDto,
};
use crate::modules::schedules::service::ScheduleService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a lecture slot
///
/// Slots of the same course may overlap.
#[utoipa::path(
    post,
    path = "/api/schedules",
    request_body = CreateScheduleDto,
    responses(
        (status = 201, description = "Schedule created", body = Schedule),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Validation failed or start_time not before end_time")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_schedule(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateScheduleDto>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let schedule = ScheduleService::create_schedule(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[utoipa::path(
    get,
    path = "/api/schedules",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of schedules", body = PaginatedSchedulesResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_schedules(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedSchedulesResponse>, AppError> {
    let schedules = ScheduleService::get_schedules(&state.db, pagination).await?;
    Ok(Json(schedules))
}

#[utoipa::path(
    get,
    path = "/api/schedules/{id}",
    params(("id" = i64, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Schedule details", body = Schedule),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_schedule(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = ScheduleService::get_schedule(&state.db, id).await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    put,
    path = "/api/schedules/{id}",
    params(("id" = i64, Path, description = "Schedule id")),
    request_body = UpdateScheduleDto,
    responses(
        (status = 200, description = "Schedule updated", body = Schedule),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Schedule not found"),
        (status = 422, description = "Validation failed or start_time not before end_time")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_schedule(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateScheduleDto>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = ScheduleService::update_schedule(&state.db, id, dto).await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    delete,
    path = "/api/schedules/{id}",
    params(("id" = i64, Path, description = "Schedule id")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_schedule(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ScheduleService::delete_schedule(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/schedules/course/{course_code}",
    params(("course_code" = String, Path, description = "Course code")),
    responses(
        (status = 200, description = "Lecture slots of the course", body = Vec<Schedule>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_schedules_by_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(course_code): Path<String>,
) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = ScheduleService::get_schedules_by_course(&state.db, &course_code).await?;
    Ok(Json(schedules))
}
