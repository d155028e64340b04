//! Quote domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The currently displayed quote.
///
/// Overwritten wholesale on each successful refresh; consumers never see
/// a partial record. Text and source default to the empty string, never
/// null.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub text: String,
    pub source: String,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl QuoteRecord {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        QuoteRecord {
            text: text.into(),
            source: source.into(),
            fetched_at: None,
        }
    }

    /// Whether the record carries no usable text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Content digest identifying this quote in history and favorites.
    pub fn digest(&self) -> String {
        quote_digest(&self.text, &self.source)
    }
}

/// MD5 digest of a quote's text and source, used as the identity key
/// for history and favorite rows.
pub fn quote_digest(text: &str, source: &str) -> String {
    format!("{:x}", md5::compute(format!("{}{}", text, source)))
}

/// Fingerprint of the local store's exported content.
///
/// Computed over the full serialized store; used only as a read-only
/// comparison key against the remote replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFingerprint {
    /// Digest of the exact exported bytes.
    pub content_hash: String,
    /// When the store content last changed.
    pub modified_at: DateTime<Utc>,
}

/// A consistent export of the whole local store.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub bytes: Vec<u8>,
    pub fingerprint: ContentFingerprint,
}

/// One past fetch recorded in the quote history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i32,
    pub text: String,
    pub source: String,
    pub digest: String,
    pub recorded_at: DateTime<Utc>,
}

/// A quote the user marked as a favorite.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteQuote {
    pub id: i32,
    pub text: String,
    pub source: String,
    pub digest: String,
    pub created_at: DateTime<Utc>,
}
