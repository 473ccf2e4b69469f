use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    add_prerequisites, check_eligibility, create_course, delete_course, get_course, get_courses,
    remove_prerequisite, update_course,
};

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course).get(get_courses))
        .route(
            "/{code}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{code}/prerequisites", post(add_prerequisites))
        .route(
            "/{code}/prerequisites/{prerequisite_code}",
            delete(remove_prerequisite),
        )
        .route("/{code}/eligibility/{student_id}", get(check_eligibility))
}
