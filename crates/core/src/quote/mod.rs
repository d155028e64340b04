//! Quote domain: the cached record, store contracts and fingerprints.

mod quote_model;
mod quote_traits;

pub use quote_model::{
    quote_digest, ContentFingerprint, FavoriteQuote, HistoryEntry, QuoteRecord, StoreSnapshot,
};
pub use quote_traits::{QuoteStoreTrait, StoreObserver};
