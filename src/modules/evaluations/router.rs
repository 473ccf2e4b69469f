use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_evaluation, delete_evaluation, get_evaluation, get_evaluations,
    get_evaluations_by_course, update_evaluation,
};

pub fn init_evaluations_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_evaluation).get(get_evaluations))
        .route(
            "/{id}",
            get(get_evaluation)
                .put(update_evaluation)
                .delete(delete_evaluation),
        )
        .route("/course/{course_code}", get(get_evaluations_by_course))
}
