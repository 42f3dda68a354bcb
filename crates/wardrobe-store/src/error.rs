//! Store error types.

use thiserror::Error;

/// Errors that can occur in the local store, the blob store, or a backup.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error from the key-value substrate.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Document (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Key contains characters the substrate cannot store.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Persisted document could not be interpreted.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Backup file could not be restored.
    #[error("invalid backup: {0}")]
    InvalidBackup(String),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
