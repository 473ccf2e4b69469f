mod common;

use axum::http::StatusCode;
use common::{body_json, seed_course, seed_student, send, token_for_role};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_allocate_identifier_endpoint(pool: PgPool) {
    seed_student(&pool, "EST-007", "Ada").await;
    let token = token_for_role(&pool, "ADMIN").await;

    let response = send(&pool, "POST", "/api/identifiers/student", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["identifier"], "EST-008");

    let response = send(&pool, "POST", "/api/identifiers/Course", Some(&token), None).await;
    let body = body_json(response).await;
    assert_eq!(body["identifier"], "CUR-001");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_allocate_identifier_requires_admin(pool: PgPool) {
    let token = token_for_role(&pool, "TEACHER").await;

    let response = send(&pool, "POST", "/api/identifiers/student", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_department_teacher_flow(pool: PgPool) {
    let token = token_for_role(&pool, "ADMIN").await;

    let response = send(
        &pool,
        "POST",
        "/api/departments",
        Some(&token),
        Some(json!({ "name": "Mathematics" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let department = body_json(response).await;
    assert_eq!(department["code"], "DEP-001");

    let response = send(
        &pool,
        "POST",
        "/api/teachers",
        Some(&token),
        Some(json!({ "name": "Grace Hopper", "department_code": "DEP-001" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let teacher = body_json(response).await;
    assert_eq!(teacher["id"], "PROF-001");
    assert_eq!(teacher["department_code"], "DEP-001");

    let response = send(&pool, "DELETE", "/api/departments/DEP-001", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&pool, "GET", "/api/teachers/PROF-001", Some(&token), None).await;
    let teacher = body_json(response).await;
    assert!(teacher["department_code"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_evaluation_and_grade_flow(pool: PgPool) {
    seed_student(&pool, "EST-001", "Ada").await;
    seed_course(&pool, "MAT-101", "Calculus I").await;
    let token = token_for_role(&pool, "TEACHER").await;

    let response = send(
        &pool,
        "POST",
        "/api/evaluations",
        Some(&token),
        Some(json!({ "course_code": "MAT-101", "realization_date": "2026-03-10" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let evaluation = body_json(response).await;
    assert_eq!(evaluation["id"], "EVAL-001");

    let response = send(
        &pool,
        "POST",
        "/api/grades",
        Some(&token),
        Some(json!({ "value": 4.2, "student_id": "EST-001", "evaluation_id": "EVAL-001" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&pool, "GET", "/api/students/EST-001/grades", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let grades = body_json(response).await;
    assert_eq!(grades.as_array().unwrap().len(), 1);
    assert_eq!(grades[0]["value"], 4.2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_and_openapi(pool: PgPool) {
    let response = send(&pool, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&pool, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert_eq!(doc["info"]["title"], "Campus Records API");
}
