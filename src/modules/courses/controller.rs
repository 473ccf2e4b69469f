use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::PaginationParams;
use tracing::instrument;

use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::modules::courses::model::{
    AddPrerequisitesDto, Course, CourseDetail, CourseQueryParams, CreateCourseDto,
    EligibilityResponse, PaginatedCoursesResponse, UpdateCourseDto,
};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a course
///
/// The code is allocated as `CUR-NNN` when omitted. `prerequisite_codes` are added through
/// the prerequisite graph; if one is rejected the course is not created.
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = CourseDetail),
        (status = 400, description = "Prerequisite rejected (self or cycle)"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Teacher or prerequisite course not found"),
        (status = 409, description = "Code already in use"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<CourseDetail>), AppError> {
    let course = CourseService::create_course(
        &state.db,
        &state.allocator,
        state.prerequisite_policy(),
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/courses",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of courses", body = PaginatedCoursesResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedCoursesResponse>, AppError> {
    let courses = CourseService::get_courses(&state.db, pagination).await?;
    Ok(Json(courses))
}

/// Get a course with its direct prerequisites
#[utoipa::path(
    get,
    path = "/api/courses/{code}",
    params(
        ("code" = String, Path, description = "Course code"),
        CourseQueryParams
    ),
    responses(
        (status = 200, description = "Course details", body = CourseDetail),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(code): Path<String>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<CourseDetail>, AppError> {
    let course = CourseService::get_course(
        &state.db,
        &code,
        params.include_prerequisites.unwrap_or(false),
    )
    .await?;

    Ok(Json(course))
}

#[utoipa::path(
    put,
    path = "/api/courses/{code}",
    params(("code" = String, Path, description = "Course code")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Course or teacher not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(code): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::update_course(&state.db, &code, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{code}",
    params(("code" = String, Path, description = "Course code")),
    responses(
        (status = 204, description = "Course deleted with its evaluations and prerequisite edges"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Course has enrollments")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_course(&state.db, &code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add prerequisites to a course
///
/// Codes are applied in order and already-present ones are skipped. Processing stops at the
/// first rejected code; edges added before it are kept.
#[utoipa::path(
    post,
    path = "/api/courses/{code}/prerequisites",
    params(("code" = String, Path, description = "Course code")),
    request_body = AddPrerequisitesDto,
    responses(
        (status = 200, description = "Course with its prerequisites", body = CourseDetail),
        (status = 400, description = "Self or cycle-closing prerequisite"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Course or prerequisite not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn add_prerequisites(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(code): Path<String>,
    ValidatedJson(dto): ValidatedJson<AddPrerequisitesDto>,
) -> Result<Json<CourseDetail>, AppError> {
    let course = CourseService::add_prerequisites(
        &state.db,
        state.prerequisite_policy(),
        &code,
        &dto.prerequisite_codes,
    )
    .await?;

    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{code}/prerequisites/{prerequisite_code}",
    params(
        ("code" = String, Path, description = "Course code"),
        ("prerequisite_code" = String, Path, description = "Prerequisite course code")
    ),
    responses(
        (status = 204, description = "Prerequisite removed, or was not present"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn remove_prerequisite(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path((code, prerequisite_code)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    CourseService::remove_prerequisite(
        &state.db,
        state.prerequisite_policy(),
        &code,
        &prerequisite_code,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Report whether a student may enroll in a course, without enrolling
#[utoipa::path(
    get,
    path = "/api/courses/{code}/eligibility/{student_id}",
    params(
        ("code" = String, Path, description = "Course code"),
        ("student_id" = String, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Eligibility report", body = EligibilityResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course or student not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn check_eligibility(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path((code, student_id)): Path<(String, String)>,
) -> Result<Json<EligibilityResponse>, AppError> {
    let report = CourseService::check_eligibility(&state.db, &code, &student_id).await?;
    Ok(Json(report))
}
