//! Content store contracts.

use async_trait::async_trait;
use std::sync::Arc;

use super::{FavoriteQuote, HistoryEntry, QuoteRecord, StoreSnapshot};
use crate::errors::Result;

/// Notified after a store mutation has been committed.
///
/// Observers must return quickly; anything slow belongs on a task of
/// its own (the sync trigger hands the notification to a channel).
pub trait StoreObserver: Send + Sync {
    fn on_store_changed(&self);
}

/// Trait for the local content store.
///
/// The store holds the current quote, the fetch history and the user's
/// favorites, and doubles as the whole-blob backup unit for sync.
/// Mutations are atomic: a reader (including a blob export) never
/// observes a torn record.
#[async_trait]
pub trait QuoteStoreTrait: Send + Sync {
    /// Read the current quote. Returns an empty record when nothing has
    /// been fetched yet.
    fn get_current_quote(&self) -> Result<QuoteRecord>;

    /// Overwrite the current quote and append it to the history, in one
    /// transaction.
    async fn save_current_quote(&self, record: &QuoteRecord) -> Result<()>;

    /// Most recent history entries, newest first.
    fn get_history(&self, limit: i64) -> Result<Vec<HistoryEntry>>;

    /// Mark a quote as favorite. Idempotent per digest.
    async fn add_favorite(&self, text: &str, source: &str) -> Result<FavoriteQuote>;

    /// Remove a favorite by its digest.
    async fn remove_favorite(&self, digest: &str) -> Result<()>;

    /// All favorites, oldest first.
    fn get_favorites(&self) -> Result<Vec<FavoriteQuote>>;

    /// Whether a quote with the given digest is a favorite.
    fn is_favorite(&self, digest: &str) -> Result<bool>;

    /// Export the whole store as a consistent snapshot.
    ///
    /// Returns `None` when the store has no content yet. The export is
    /// deterministic: the same rows always serialize to the same bytes,
    /// so fingerprints survive a push/pull round-trip.
    fn export_blob(&self) -> Result<Option<StoreSnapshot>>;

    /// Replace the whole store with previously exported bytes, in one
    /// transaction.
    async fn import_blob(&self, bytes: &[u8]) -> Result<()>;

    /// Register an observer for committed mutations.
    fn register_observer(&self, observer: Arc<dyn StoreObserver>);
}
