use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::PaginationParams;
use tracing::instrument;

use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::modules::departments::model::{
    CreateDepartmentDto, Department, PaginatedDepartmentsResponse, UpdateDepartmentDto,
};
use crate::modules::departments::service::DepartmentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 409, description = "Code already in use"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_department(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    let department = DepartmentService::create_department(&state.db, &state.allocator, dto).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    get,
    path = "/api/departments",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of departments", body = PaginatedDepartmentsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_departments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedDepartmentsResponse>, AppError> {
    let departments = DepartmentService::get_departments(&state.db, pagination).await?;
    Ok(Json(departments))
}

#[utoipa::path(
    get,
    path = "/api/departments/{code}",
    params(("code" = String, Path, description = "Department code")),
    responses(
        (status = 200, description = "Department details", body = Department),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_department(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::get_department(&state.db, &code).await?;
    Ok(Json(department))
}

#[utoipa::path(
    put,
    path = "/api/departments/{code}",
    params(("code" = String, Path, description = "Department code")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_department(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(code): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::update_department(&state.db, &code, dto).await?;
    Ok(Json(department))
}

#[utoipa::path(
    delete,
    path = "/api/departments/{code}",
    params(("code" = String, Path, description = "Department code")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    DepartmentService::delete_department(&state.db, &code).await?;
    Ok(StatusCode::NO_CONTENT)
}
