use campus_records::{EntityKind, IdAllocator};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::track_identifier_allocated;
use crate::store::PgRecordStore;
use crate::utils::errors::{AppError, records_error};

pub struct IdentifierService;

impl IdentifierService {
    /// Allocates the next identifier in the namespace of `entity_type`.
    #[instrument(skip(db, allocator))]
    pub async fn allocate(
        db: &PgPool,
        allocator: &IdAllocator,
        entity_type: &str,
    ) -> Result<String, AppError> {
        let store = PgRecordStore::new(db.clone());

        let identifier = allocator
            .allocate(&store, entity_type)
            .await
            .map_err(records_error)?;

        track_identifier_allocated(&identifier);
        Ok(identifier)
    }

    /// Returns the client-supplied key, or allocates one when it is absent or blank.
    pub async fn key_or_allocate(
        db: &PgPool,
        allocator: &IdAllocator,
        kind: EntityKind,
        supplied: Option<String>,
    ) -> Result<String, AppError> {
        match supplied.map(|key| key.trim().to_string()) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Self::allocate(db, allocator, kind.tag()).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_supplied_key_is_kept(pool: PgPool) {
        let allocator = IdAllocator::default();

        let key = IdentifierService::key_or_allocate(
            &pool,
            &allocator,
            EntityKind::Student,
            Some(" LEGACY-1 ".into()),
        )
        .await
        .unwrap();

        assert_eq!(key, "LEGACY-1");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_blank_key_is_allocated(pool: PgPool) {
        let allocator = IdAllocator::default();

        let first =
            IdentifierService::key_or_allocate(&pool, &allocator, EntityKind::Teacher, Some("  ".into()))
                .await
                .unwrap();
        let second = IdentifierService::key_or_allocate(&pool, &allocator, EntityKind::Teacher, None)
            .await
            .unwrap();

        assert_eq!(first, "PROF-001");
        assert_eq!(second, "PROF-002");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unmapped_tag_uses_three_letters(pool: PgPool) {
        let allocator = IdAllocator::default();

        let id = IdentifierService::allocate(&pool, &allocator, "schedule").await.unwrap();
        assert_eq!(id, "SCH-001");

        let err = IdentifierService::allocate(&pool, &allocator, "42").await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
