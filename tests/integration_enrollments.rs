mod common;

use axum::http::StatusCode;
use common::{
    body_json, count_rows, seed_course, seed_enrollment, seed_prerequisite, seed_student, send,
    token_for_role,
};
use serde_json::json;
use sqlx::PgPool;

async fn seed_physics(pool: &PgPool) {
    seed_student(pool, "EST-001", "Ada").await;
    seed_course(pool, "PHY-101", "Physics I").await;
    seed_course(pool, "PHY-201", "Physics II").await;
    seed_prerequisite(pool, "PHY-201", "PHY-101").await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enrollment_rejected_without_prerequisites(pool: PgPool) {
    seed_physics(&pool).await;
    let token = token_for_role(&pool, "ADMIN").await;

    let response = send(
        &pool,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({ "student_id": "EST-001", "course_code": "PHY-201" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Student does not meet the course prerequisites. Missing prerequisites: Physics I"
    );
    assert_eq!(count_rows(&pool, "enrollments").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_attempt_does_not_count(pool: PgPool) {
    seed_physics(&pool).await;
    seed_enrollment(&pool, "EST-001", "PHY-101", Some(2.9)).await;
    let token = token_for_role(&pool, "ADMIN").await;

    let response = send(
        &pool,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({ "student_id": "EST-001", "course_code": "PHY-201" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enrollment_created_after_passing(pool: PgPool) {
    seed_physics(&pool).await;
    seed_enrollment(&pool, "EST-001", "PHY-101", Some(2.9)).await;
    seed_enrollment(&pool, "EST-001", "PHY-101", Some(3.0)).await;
    let token = token_for_role(&pool, "ADMIN").await;

    let response = send(
        &pool,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "student_id": "EST-001",
            "course_code": "PHY-201",
            "enrollment_date": "2026-02-01"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["course_code"], "PHY-201");
    assert_eq!(body["enrollment_date"], "2026-02-01");
    assert!(body["final_grade"].is_null());
    assert_eq!(count_rows(&pool, "enrollments").await, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enrollment_unknown_student(pool: PgPool) {
    seed_course(&pool, "PHY-101", "Physics I").await;
    let token = token_for_role(&pool, "ADMIN").await;

    let response = send(
        &pool,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({ "student_id": "EST-404", "course_code": "PHY-101" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_sets_final_grade_but_cannot_enroll(pool: PgPool) {
    seed_physics(&pool).await;
    seed_enrollment(&pool, "EST-001", "PHY-101", None).await;
    let token = token_for_role(&pool, "TEACHER").await;

    let enroll = send(
        &pool,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({ "student_id": "EST-001", "course_code": "PHY-101" })),
    )
    .await;
    assert_eq!(enroll.status(), StatusCode::FORBIDDEN);

    let id: i64 = sqlx::query_scalar("SELECT id FROM enrollments")
        .fetch_one(&pool)
        .await
        .unwrap();

    let response = send(
        &pool,
        "PUT",
        &format!("/api/enrollments/{id}"),
        Some(&token),
        Some(json!({ "final_grade": 4.5 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["final_grade"], 4.5);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_final_grade_out_of_range(pool: PgPool) {
    seed_physics(&pool).await;
    seed_enrollment(&pool, "EST-001", "PHY-101", None).await;
    let token = token_for_role(&pool, "ADMIN").await;

    let id: i64 = sqlx::query_scalar("SELECT id FROM enrollments")
        .fetch_one(&pool)
        .await
        .unwrap();

    let response = send(
        &pool,
        "PUT",
        &format!("/api/enrollments/{id}"),
        Some(&token),
        Some(json!({ "final_grade": 5.5 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_update_keeps_final_grade(pool: PgPool) {
    seed_physics(&pool).await;
    seed_enrollment(&pool, "EST-001", "PHY-101", Some(3.5)).await;
    let token = token_for_role(&pool, "ADMIN").await;

    let id: i64 = sqlx::query_scalar("SELECT id FROM enrollments")
        .fetch_one(&pool)
        .await
        .unwrap();

    let response = send(
        &pool,
        "PUT",
        &format!("/api/enrollments/{id}"),
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "final_grade is required");

    let grade: Option<f64> = sqlx::query_scalar("SELECT final_grade FROM enrollments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(grade, Some(3.5));

    let response = send(
        &pool,
        "PUT",
        &format!("/api/enrollments/{id}"),
        Some(&token),
        Some(json!({ "final_grade": null })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["final_grade"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enrollments_by_student(pool: PgPool) {
    seed_physics(&pool).await;
    seed_enrollment(&pool, "EST-001", "PHY-101", Some(3.5)).await;
    let token = token_for_role(&pool, "STUDENT").await;

    let response = send(
        &pool,
        "GET",
        "/api/enrollments/student/EST-001",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["total"], 1);
}
