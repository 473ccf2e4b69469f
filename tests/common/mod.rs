use axum::body::Body;
use axum::http::{Request, Response};
use campus::campus_core::hash_password;
use campus::config::{CorsConfig, JwtConfig};
use campus::router::init_router;
use campus::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

pub const PASSWORD: &str = "secret123";

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState::new(pool, JwtConfig::from_env(), CorsConfig::from_env());
    init_router(state)
}

/// Inserts an account directly; role is one of `ADMIN`, `TEACHER`, `STUDENT`.
pub async fn create_test_user(pool: &PgPool, username: &str, role: &str) {
    let hashed = hash_password(PASSWORD).unwrap();

    sqlx::query("INSERT INTO users (username, password, role) VALUES ($1, $2, $3)")
        .bind(username)
        .bind(hashed)
        .bind(role)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn get_auth_token(pool: &PgPool, username: &str) -> String {
    let response = send(
        pool,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": PASSWORD })),
    )
    .await;
    let body = body_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

/// Creates a user with `role` and returns its bearer token.
#[allow(dead_code)]
pub async fn token_for_role(pool: &PgPool, role: &str) -> String {
    let username = format!("{}_user", role.to_lowercase());
    create_test_user(pool, &username, role).await;
    get_auth_token(pool, &username).await
}

pub async fn send(
    pool: &PgPool,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    setup_test_app(pool.clone()).oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[allow(dead_code)]
pub async fn seed_student(pool: &PgPool, id: &str, name: &str) {
    sqlx::query("INSERT INTO students (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn seed_course(pool: &PgPool, code: &str, name: &str) {
    sqlx::query("INSERT INTO courses (code, name) VALUES ($1, $2)")
        .bind(code)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn seed_prerequisite(pool: &PgPool, course: &str, prerequisite: &str) {
    sqlx::query(
        "INSERT INTO course_prerequisites (course_code, prerequisite_code) VALUES ($1, $2)",
    )
    .bind(course)
    .bind(prerequisite)
    .execute(pool)
    .await
    .unwrap();
}

#[allow(dead_code)]
pub async fn seed_enrollment(pool: &PgPool, student: &str, course: &str, grade: Option<f64>) {
    sqlx::query(
        "INSERT INTO enrollments (student_id, course_code, enrollment_date, final_grade)
         VALUES ($1, $2, CURRENT_DATE, $3)",
    )
    .bind(student)
    .bind(course)
    .bind(grade)
    .execute(pool)
    .await
    .unwrap();
}

#[allow(dead_code)]
pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
