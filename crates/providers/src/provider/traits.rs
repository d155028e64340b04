//! Quote provider trait definition.

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::QuoteData;

/// Trait for quote providers.
///
/// Implement this trait to add support for a new quote source. All
/// methods other than [`get_quote`](Self::get_quote) must return
/// immediately; `get_quote` runs on a background task, may perform
/// network I/O, and is cancelled by dropping its future.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Stable identifier for this provider.
    ///
    /// Used as the registry key and persisted in configuration when the
    /// user selects the provider.
    fn id(&self) -> &'static str;

    /// User-facing name of the quote source.
    fn display_name(&self) -> &'static str;

    /// Minimum refresh interval (in seconds) imposed by the source.
    ///
    /// Returns 0 when the source imposes no minimum. Returns
    /// `u32::MAX` when quotes from this source should never be
    /// refreshed automatically.
    fn minimum_refresh_interval(&self) -> u32 {
        0
    }

    /// Whether fetching a quote requires network connectivity.
    ///
    /// Returns `false` for providers that read from data stored locally
    /// on the device.
    fn requires_network(&self) -> bool {
        true
    }

    /// Fetch a new quote from the source.
    ///
    /// Returns the quote on success, or a [`ProviderError`] on failure.
    /// Implementations should return [`ProviderError::EmptyQuote`]
    /// rather than an empty record when the source produced nothing.
    async fn get_quote(&self) -> Result<QuoteData, ProviderError>;
}
