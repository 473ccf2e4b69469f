use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::PaginationParams;
use tracing::instrument;

use crate::middleware::auth::{AuthUser, RequireAdmin, RequireStaff};
use crate::modules::enrollments::model::{
    CreateEnrollmentDto, Enrollment, PaginatedEnrollmentsResponse, UpdateEnrollmentDto,
};
use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Enroll a student in a course
///
/// Succeeds only if the student has passed (final grade >= 3.0) every direct prerequisite of
/// the course. On rejection the error lists the missing prerequisite names and nothing is
/// written.
#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = CreateEnrollmentDto,
    responses(
        (status = 201, description = "Enrollment created, ungraded", body = Enrollment),
        (status = 400, description = "Prerequisites not met"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Student or course not found")
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateEnrollmentDto>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = EnrollmentService::create_enrollment(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[utoipa::path(
    get,
    path = "/api/enrollments",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of enrollments", body = PaginatedEnrollmentsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_enrollments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedEnrollmentsResponse>, AppError> {
    let enrollments = EnrollmentService::get_enrollments(&state.db, pagination).await?;
    Ok(Json(enrollments))
}

#[utoipa::path(
    get,
    path = "/api/enrollments/{id}",
    params(("id" = i64, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment details", body = Enrollment),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_enrollment(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = EnrollmentService::get_enrollment(&state.db, id).await?;
    Ok(Json(enrollment))
}

#[utoipa::path(
    put,
    path = "/api/enrollments/{id}",
    params(("id" = i64, Path, description = "Enrollment id")),
    request_body = UpdateEnrollmentDto,
    responses(
        (status = 200, description = "Final grade recorded", body = Enrollment),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 404, description = "Enrollment not found"),
        (status = 422, description = "Grade outside 0.0-5.0")
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_enrollment(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateEnrollmentDto>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = EnrollmentService::update_final_grade(&state.db, id, dto).await?;
    Ok(Json(enrollment))
}

#[utoipa::path(
    delete,
    path = "/api/enrollments/{id}",
    params(("id" = i64, Path, description = "Enrollment id")),
    responses(
        (status = 204, description = "Enrollment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    EnrollmentService::delete_enrollment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/enrollments/student/{student_id}",
    params(
        ("student_id" = String, Path, description = "Student id"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Enrollment history of the student", body = PaginatedEnrollmentsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_enrollments_by_student(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(student_id): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedEnrollmentsResponse>, AppError> {
    let enrollments =
        EnrollmentService::get_enrollments_by_student(&state.db, &student_id, pagination).await?;
    Ok(Json(enrollments))
}

#[utoipa::path(
    get,
    path = "/api/enrollments/course/{course_code}",
    params(
        ("course_code" = String, Path, description = "Course code"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Enrollments in the course", body = PaginatedEnrollmentsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found")
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_enrollments_by_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(course_code): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedEnrollmentsResponse>, AppError> {
    let enrollments =
        EnrollmentService::get_enrollments_by_course(&state.db, &course_code, pagination).await?;
    Ok(Json(enrollments))
}
