//! SQLite storage layer for quotekeeper.
//!
//! Implements the core crate's store traits on top of Diesel + SQLite:
//! a key/value settings table, the quote history, the favorites
//! collection and the store metadata used for blob fingerprints. All
//! mutations are serialized through a single writer actor so readers
//! (including whole-store blob exports) always observe a consistent
//! snapshot.

pub mod db;
pub mod errors;
pub mod quote;
pub mod schema;
pub mod settings;

pub use db::{create_pool, get_connection, spawn_writer, DbPool, WriteHandle};
pub use errors::StorageError;
pub use quote::SqliteQuoteStore;
pub use settings::SettingsRepository;
