//! # Campus Models
//!
//! Database rows, request DTOs and response shapes for the Campus Records API.
//!
//! - [`auth`]: registration, login and the user row
//! - [`departments`], [`teachers`], [`courses`], [`students`]: catalog records
//! - [`enrollments`]: enrollment attempts and final grades
//! - [`evaluations`], [`grades`]: per-course assessments and their scores
//! - [`schedules`]: weekly lecture slots of a course
//! - [`identifiers`]: allocated identifier responses

pub mod auth;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod evaluations;
pub mod grades;
pub mod identifiers;
pub mod schedules;
pub mod students;
pub mod teachers;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, User, UserResponse};
pub use courses::{
    AddPrerequisitesDto, Course, CourseDetail, CourseQueryParams, CourseSummary,
    CreateCourseDto, EligibilityResponse, PaginatedCoursesResponse, PrerequisiteInfo,
    UpdateCourseDto,
};
pub use departments::{
    CreateDepartmentDto, Department, PaginatedDepartmentsResponse, UpdateDepartmentDto,
};
pub use enrollments::{
    CreateEnrollmentDto, Enrollment, PaginatedEnrollmentsResponse, UpdateEnrollmentDto,
};
pub use evaluations::{
    CreateEvaluationDto, Evaluation, PaginatedEvaluationsResponse, UpdateEvaluationDto,
};
pub use grades::{CreateGradeDto, Grade, PaginatedGradesResponse, UpdateGradeDto};
pub use identifiers::AllocatedIdentifier;
pub use schedules::{
    CreateScheduleDto, PaginatedSchedulesResponse, Schedule, UpdateScheduleDto,
};
pub use students::{CreateStudentDto, PaginatedStudentsResponse, Student, UpdateStudentDto};
pub use teachers::{CreateTeacherDto, PaginatedTeachersResponse, Teacher, UpdateTeacherDto};
