use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::middleware::auth::RequireAdmin;
use crate::modules::identifiers::model::AllocatedIdentifier;
use crate::modules::identifiers::service::IdentifierService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Allocate the next sequential identifier for an entity type
///
/// Known types map to fixed prefixes (`student` -> `EST`, `teacher` -> `PROF`,
/// `department` -> `DEP`, `course` -> `CUR`, `evaluation` -> `EVAL`); other tags use their
/// first three letters.
#[utoipa::path(
    post,
    path = "/api/identifiers/{entity_type}",
    params(
        ("entity_type" = String, Path, description = "Entity type tag, e.g. student")
    ),
    responses(
        (status = 200, description = "Identifier allocated", body = AllocatedIdentifier),
        (status = 400, description = "Tag has no letters"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN")
    ),
    tag = "Identifiers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn allocate_identifier(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(entity_type): Path<String>,
) -> Result<Json<AllocatedIdentifier>, AppError> {
    let identifier = IdentifierService::allocate(&state.db, &state.allocator, &entity_type).await?;

    Ok(Json(AllocatedIdentifier {
        entity_type,
        identifier,
    }))
}
