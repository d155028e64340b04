//! Storage-specific error types and their mapping to core errors.

use thiserror::Error;

use quotekeeper_core::errors::{Error, StoreError};

/// Errors raised inside the SQLite storage layer.
///
/// Converted to [`StoreError`] at the trait boundary so callers stay
/// database-agnostic. The `Core` variant carries an already-converted
/// error through the writer actor's transaction unchanged.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Unsupported blob version: {0}")]
    UnsupportedBlobVersion(u32),

    #[error(transparent)]
    Core(#[from] Error),
}

impl StorageError {
    /// Unwrap into the core error type, mapping storage details onto
    /// the database-agnostic variants.
    pub fn into_core(self) -> Error {
        match self {
            StorageError::Core(e) => e,
            StorageError::Query(diesel::result::Error::NotFound) => {
                Error::Store(StoreError::NotFound("record not found".to_string()))
            }
            StorageError::Query(e) => Error::Store(StoreError::QueryFailed(e.to_string())),
            StorageError::Pool(e) => Error::Store(StoreError::ConnectionFailed(e.to_string())),
            StorageError::Migration(e) => Error::Store(StoreError::MigrationFailed(e)),
            StorageError::Serde(e) => Error::Store(StoreError::Serialization(e.to_string())),
            StorageError::UnsupportedBlobVersion(v) => {
                Error::Store(StoreError::Serialization(format!(
                    "unsupported blob version {}",
                    v
                )))
            }
        }
    }
}
