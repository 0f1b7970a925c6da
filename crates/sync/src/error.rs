//! Sync engine error types.

use armoire_db::DbError;
use armoire_storage::StorageError;
use thiserror::Error;

/// Sync engine errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("storage bucket does not exist")]
    BucketMissing,

    #[error("catalog not found: {0}")]
    CatalogMissing(String),

    #[error("malformed catalog: {0}")]
    CatalogMalformed(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("core error: {0}")]
    Core(#[from] armoire_core::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("sync operation requires confirmation")]
    ConfirmationRequired,
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
