use axum::http::{HeaderValue, Method};
use axum::{Json, Router, middleware, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_app, metrics_middleware};
use crate::modules::auth::init_auth_router;
use crate::modules::courses::init_courses_router;
use crate::modules::departments::init_departments_router;
use crate::modules::enrollments::init_enrollments_router;
use crate::modules::evaluations::init_evaluations_router;
use crate::modules::grades::init_grades_router;
use crate::modules::identifiers::init_identifiers_router;
use crate::modules::schedules::init_schedules_router;
use crate::modules::students::init_students_router;
use crate::modules::teachers::init_teachers_router;
use crate::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn init_router(state: AppState) -> Router {
    init_router_with_metrics(state, None)
}

/// Main router; `/metrics` is served when a Prometheus handle is given.
pub fn init_router_with_metrics(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/departments", init_departments_router())
                .nest("/teachers", init_teachers_router())
                .nest("/courses", init_courses_router())
                .nest("/students", init_students_router())
                .nest("/enrollments", init_enrollments_router())
                .nest("/evaluations", init_evaluations_router())
                .nest("/grades", init_grades_router())
                .nest("/schedules", init_schedules_router())
                .nest("/identifiers", init_identifiers_router()),
        )
        .with_state(state.clone());

    if let Some(handle) = metrics {
        router = router
            .merge(metrics_app(handle))
            .layer(middleware::from_fn(metrics_middleware));
    }

    router
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
