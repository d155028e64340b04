//! Core error types for quotekeeper.
//!
//! This module defines storage- and transport-agnostic error types.
//! Backend-specific errors (Diesel, SQLite, HTTP transports) are
//! converted to these types at the crate boundary.

use thiserror::Error;

use quotekeeper_providers::ProviderError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the quotekeeper application.
///
/// A failed provider fetch is recovered by the executor's back-off and a
/// failed remote operation leaves the sync baseline untouched; neither
/// escapes a cycle as a fatal condition. Store errors abort the cycle
/// and are surfaced to its caller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Remote store operation failed: {0}")]
    Remote(#[from] RemoteStoreError),

    #[error("Provider operation failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Backend-agnostic error type for local store operations.
///
/// Uses `String` payloads so the storage layer can convert its own
/// errors (Diesel, r2d2, serde) into this format.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create store pool: {0}")]
    PoolCreationFailed(String),

    /// A query failed to execute.
    #[error("Store query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A transaction failed.
    #[error("Store transaction failed: {0}")]
    TransactionFailed(String),

    /// Schema migration failed.
    #[error("Store migration failed: {0}")]
    MigrationFailed(String),

    /// Encoding or decoding the exported blob failed.
    #[error("Blob serialization failed: {0}")]
    Serialization(String),
}

/// Errors from the remote object store.
#[derive(Error, Debug)]
pub enum RemoteStoreError {
    /// A network error occurred while talking to the remote store.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote store answered with an error response.
    #[error("Remote API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Error detail reported by the remote store
        message: String,
    },

    /// The named object does not exist on the remote store.
    #[error("Remote object not found: {0}")]
    ObjectNotFound(String),

    /// The remote store's response could not be interpreted.
    #[error("Invalid remote response: {0}")]
    InvalidResponse(String),

    /// Missing or rejected credentials.
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl RemoteStoreError {
    /// Create an API error from status and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
