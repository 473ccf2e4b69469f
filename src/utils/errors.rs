//! Mapping of domain and database failures onto HTTP statuses.

use anyhow::anyhow;
use campus_records::RecordsError;

pub use campus_core::AppError;

/// Maps a records core error onto its HTTP status.
pub fn records_error(err: RecordsError) -> AppError {
    match &err {
        RecordsError::NotFound { .. } => AppError::not_found(err),
        RecordsError::PrerequisitesNotMet { .. }
        | RecordsError::SelfPrerequisite(_)
        | RecordsError::CyclicPrerequisite { .. }
        | RecordsError::InvalidEntityTag(_) => AppError::bad_request(err),
        RecordsError::StoreUnavailable(_) => AppError::internal(err),
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

pub fn is_check_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_check_violation())
}

/// Insert or update failure: a duplicate key is 409, a dangling reference is 404.
pub fn write_error(err: sqlx::Error, duplicate: &str, dangling: &str) -> AppError {
    if is_unique_violation(&err) {
        return AppError::conflict(anyhow!("{duplicate}"));
    }
    if is_foreign_key_violation(&err) {
        return AppError::not_found(anyhow!("{dangling}"));
    }
    AppError::from(err)
}

/// Delete failure: a row still referenced under `ON DELETE RESTRICT` is 409.
pub fn delete_error(err: sqlx::Error, referenced: &str) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::conflict(anyhow!("{referenced}"));
    }
    AppError::from(err)
}
