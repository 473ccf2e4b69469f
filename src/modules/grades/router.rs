use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_grade, delete_grade, get_grade, get_grades, get_grades_by_evaluation,
    get_grades_by_student, update_grade,
};

pub fn init_grades_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_grade).get(get_grades))
        .route(
            "/{id}",
            get(get_grade).put(update_grade).delete(delete_grade),
        )
        .route("/student/{student_id}", get(get_grades_by_student))
        .route("/evaluation/{evaluation_id}", get(get_grades_by_evaluation))
}
