mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, get_auth_token, send};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_register_returns_admin_token(pool: PgPool) {
    let response = send(
        &pool,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "registrar", "password": "secret123" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert!(body["access_token"].as_str().is_some());
    assert_eq!(body["user"]["role"], "ADMIN");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_username_conflicts(pool: PgPool) {
    create_test_user(&pool, "registrar", "ADMIN").await;

    let response = send(
        &pool,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "registrar", "password": "secret123" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_short_username_is_unprocessable(pool: PgPool) {
    let response = send(
        &pool,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "abc", "password": "secret123" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_then_me(pool: PgPool) {
    create_test_user(&pool, "teacher1", "TEACHER").await;
    let token = get_auth_token(&pool, "teacher1").await;

    let response = send(&pool, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["username"], "teacher1");
    assert_eq!(body["role"], "TEACHER");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_test_user(&pool, "teacher1", "TEACHER").await;

    let response = send(
        &pool,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "teacher1", "password": "wrong-pass" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid username or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_without_token(pool: PgPool) {
    let response = send(&pool, "GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
