mod common;

use axum::http::StatusCode;
use common::{body_json, count_rows, seed_course, send, token_for_role};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_list_and_cascade_with_course(pool: PgPool) {
    seed_course(&pool, "MAT-101", "Calculus I").await;
    let token = token_for_role(&pool, "ADMIN").await;

    for (start, end) in [("08:00:00", "10:00:00"), ("09:00:00", "11:00:00")] {
        let response = send(
            &pool,
            "POST",
            "/api/schedules",
            Some(&token),
            Some(json!({
                "day": "Monday",
                "start_time": start,
                "end_time": end,
                "course_code": "MAT-101"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(
        &pool,
        "GET",
        "/api/schedules/course/MAT-101",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let slots = body_json(response).await;
    assert_eq!(slots.as_array().unwrap().len(), 2);
    assert_eq!(slots[0]["start_time"], "08:00:00");
    assert_eq!(slots[1]["end_time"], "11:00:00");

    let response = send(&pool, "DELETE", "/api/courses/MAT-101", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(count_rows(&pool, "schedules").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_create_schedule(pool: PgPool) {
    seed_course(&pool, "MAT-101", "Calculus I").await;
    let token = token_for_role(&pool, "TEACHER").await;

    let response = send(
        &pool,
        "POST",
        "/api/schedules",
        Some(&token),
        Some(json!({
            "day": "Monday",
            "start_time": "08:00:00",
            "end_time": "10:00:00",
            "course_code": "MAT-101"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(count_rows(&pool, "schedules").await, 0);
}
