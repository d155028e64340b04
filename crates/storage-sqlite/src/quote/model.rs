//! Row types and the exported blob envelope.

use chrono::{TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use quotekeeper_core::quote::{FavoriteQuote, HistoryEntry, QuoteRecord};

#[derive(Queryable, Debug, Clone)]
#[diesel(table_name = crate::schema::quote_history)]
pub struct HistoryRow {
    pub id: i32,
    pub quote_text: String,
    pub quote_source: String,
    pub digest: String,
    pub recorded_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quote_history)]
pub struct NewHistoryRow {
    pub quote_text: String,
    pub quote_source: String,
    pub digest: String,
    pub recorded_at: i64,
}

#[derive(Queryable, Debug, Clone)]
#[diesel(table_name = crate::schema::favorite_quotes)]
pub struct FavoriteRow {
    pub id: i32,
    pub quote_text: String,
    pub quote_source: String,
    pub digest: String,
    pub created_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorite_quotes)]
pub struct NewFavoriteRow {
    pub quote_text: String,
    pub quote_source: String,
    pub digest: String,
    pub created_at: i64,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        HistoryEntry {
            id: row.id,
            text: row.quote_text,
            source: row.quote_source,
            digest: row.digest,
            recorded_at: Utc
                .timestamp_millis_opt(row.recorded_at)
                .single()
                .unwrap_or(chrono::DateTime::UNIX_EPOCH),
        }
    }
}

impl From<FavoriteRow> for FavoriteQuote {
    fn from(row: FavoriteRow) -> Self {
        FavoriteQuote {
            id: row.id,
            text: row.quote_text,
            source: row.quote_source,
            digest: row.digest,
            created_at: Utc
                .timestamp_millis_opt(row.created_at)
                .single()
                .unwrap_or(chrono::DateTime::UNIX_EPOCH),
        }
    }
}

/// Current version of the exported blob envelope.
pub const STORE_BLOB_VERSION: u32 = 1;

/// One quote inside the exported blob. Row ids are deliberately left
/// out so the serialization is stable across an export/import
/// round-trip.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlobQuote {
    pub text: String,
    pub source: String,
    pub digest: String,
    pub timestamp: i64,
}

/// The whole-store backup unit exchanged with the remote store.
///
/// Serialization is deterministic: the same store content always
/// produces the same bytes, so content hashes are comparable across
/// replicas.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreBlob {
    pub version: u32,
    pub current: QuoteRecord,
    pub history: Vec<BlobQuote>,
    pub favorites: Vec<BlobQuote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_serialization_is_deterministic() {
        let blob = StoreBlob {
            version: STORE_BLOB_VERSION,
            current: QuoteRecord::new("text", "source"),
            history: vec![BlobQuote {
                text: "text".to_string(),
                source: "source".to_string(),
                digest: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
                timestamp: 1_700_000_000_000,
            }],
            favorites: vec![],
        };
        let a = serde_json::to_vec(&blob).unwrap();
        let b = serde_json::to_vec(&blob).unwrap();
        assert_eq!(a, b);

        let decoded: StoreBlob = serde_json::from_slice(&a).unwrap();
        assert_eq!(decoded, blob);
    }
}
