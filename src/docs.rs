use campus_auth::Role;
use campus_core::{PaginationMeta, PaginationParams};
use campus_models::{
    AddPrerequisitesDto, AllocatedIdentifier, Course, CourseDetail, CourseSummary,
    CreateCourseDto, CreateDepartmentDto, CreateEnrollmentDto, CreateEvaluationDto,
    CreateGradeDto, CreateScheduleDto, CreateStudentDto, CreateTeacherDto, Department,
    EligibilityResponse, Enrollment, Evaluation, Grade, LoginRequest, LoginResponse,
    PaginatedCoursesResponse, PaginatedDepartmentsResponse, PaginatedEnrollmentsResponse,
    PaginatedEvaluationsResponse, PaginatedGradesResponse, PaginatedSchedulesResponse,
    PaginatedStudentsResponse, PaginatedTeachersResponse, PrerequisiteInfo, RegisterRequest,
    Schedule, Student, Teacher, UpdateCourseDto, UpdateDepartmentDto, UpdateEnrollmentDto,
    UpdateEvaluationDto, UpdateGradeDto, UpdateScheduleDto, UpdateStudentDto, UpdateTeacherDto,
    UserResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

/// Body of every error response.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_profile,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::add_prerequisites,
        crate::modules::courses::controller::remove_prerequisite,
        crate::modules::courses::controller::check_eligibility,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::get_student_grades,
        crate::modules::students::controller::get_student_enrollments,
        crate::modules::enrollments::controller::create_enrollment,
        crate::modules::enrollments::controller::get_enrollments,
        crate::modules::enrollments::controller::get_enrollment,
        crate::modules::enrollments::controller::update_enrollment,
        crate::modules::enrollments::controller::delete_enrollment,
        crate::modules::enrollments::controller::get_enrollments_by_student,
        crate::modules::enrollments::controller::get_enrollments_by_course,
        crate::modules::evaluations::controller::create_evaluation,
        crate::modules::evaluations::controller::get_evaluations,
        crate::modules::evaluations::controller::get_evaluation,
        crate::modules::evaluations::controller::update_evaluation,
        crate::modules::evaluations::controller::delete_evaluation,
        crate::modules::evaluations::controller::get_evaluations_by_course,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::get_grades,
        crate::modules::grades::controller::get_grade,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::delete_grade,
        crate::modules::grades::controller::get_grades_by_student,
        crate::modules::grades::controller::get_grades_by_evaluation,
        crate::modules::schedules::controller::create_schedule,
        crate::modules::schedules::controller::get_schedules,
        crate::modules::schedules::controller::get_schedule,
        crate::modules::schedules::controller::update_schedule,
        crate::modules::schedules::controller::delete_schedule,
        crate::modules::schedules::controller::get_schedules_by_course,
        crate::modules::identifiers::controller::allocate_identifier,
    ),
    components(
        schemas(
            ErrorResponse,
            Role,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserResponse,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            PaginatedDepartmentsResponse,
            Teacher,
            CreateTeacherDto,
            UpdateTeacherDto,
            PaginatedTeachersResponse,
            Course,
            CourseSummary,
            CourseDetail,
            PrerequisiteInfo,
            CreateCourseDto,
            UpdateCourseDto,
            AddPrerequisitesDto,
            EligibilityResponse,
            PaginatedCoursesResponse,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            Enrollment,
            CreateEnrollmentDto,
            UpdateEnrollmentDto,
            PaginatedEnrollmentsResponse,
            Evaluation,
            CreateEvaluationDto,
            UpdateEvaluationDto,
            PaginatedEvaluationsResponse,
            Grade,
            CreateGradeDto,
            UpdateGradeDto,
            PaginatedGradesResponse,
            Schedule,
            CreateScheduleDto,
            UpdateScheduleDto,
            PaginatedSchedulesResponse,
            AllocatedIdentifier,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the current account"),
        (name = "Departments", description = "Academic departments"),
        (name = "Teachers", description = "Teaching staff"),
        (name = "Courses", description = "Courses, prerequisites and eligibility"),
        (name = "Students", description = "Students and their records"),
        (name = "Enrollments", description = "Prerequisite-gated enrollment and final grades"),
        (name = "Evaluations", description = "Course evaluations"),
        (name = "Grades", description = "Per-evaluation grades"),
        (name = "Schedules", description = "Weekly lecture slots of courses"),
        (name = "Identifiers", description = "Sequential identifier allocation")
    ),
    info(
        title = "Campus Records API",
        version = "0.1.0",
        description = "Academic records REST API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
