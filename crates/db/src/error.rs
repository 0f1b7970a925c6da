//! Database adapter error types.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to add column {column}: {message}")]
    SchemaEvolution { column: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for database operations.
pub type DbResult<T> = std::result::Result<T, DbError>;
