use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::allocate_identifier;

pub fn init_identifiers_router() -> Router<AppState> {
    Router::new().route("/{entity_type}", post(allocate_identifier))
}
