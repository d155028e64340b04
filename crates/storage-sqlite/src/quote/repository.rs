//! SQLite implementation of the content store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use diesel::prelude::*;
use log::debug;

use quotekeeper_core::constants::{
    SETTING_LAST_FETCHED_AT, SETTING_QUOTE_SOURCE, SETTING_QUOTE_TEXT,
};
use quotekeeper_core::errors::{Result, StoreError};
use quotekeeper_core::quote::{
    quote_digest, ContentFingerprint, FavoriteQuote, HistoryEntry, QuoteRecord, QuoteStoreTrait,
    StoreObserver, StoreSnapshot,
};
use quotekeeper_core::utils::Clock;

use super::model::{
    BlobQuote, FavoriteRow, HistoryRow, NewFavoriteRow, NewHistoryRow, StoreBlob,
    STORE_BLOB_VERSION,
};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{app_settings, favorite_quotes, quote_history, store_meta};
use crate::settings::AppSettingRow;

const META_MODIFIED_AT: &str = "modified_at";

pub struct SqliteQuoteStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    clock: Arc<dyn Clock>,
    observers: Mutex<Vec<Arc<dyn StoreObserver>>>,
}

impl SqliteQuoteStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle, clock: Arc<dyn Clock>) -> Self {
        SqliteQuoteStore {
            pool,
            writer,
            clock,
            observers: Mutex::new(Vec::new()),
        }
    }

    fn notify_observers(&self) {
        for observer in self.observers.lock().unwrap().iter() {
            observer.on_store_changed();
        }
    }

    fn read_setting(conn: &mut SqliteConnection, key: &str) -> Result<Option<String>> {
        app_settings::table
            .filter(app_settings::setting_key.eq(key))
            .select(app_settings::setting_value)
            .first::<String>(conn)
            .optional()
            .map_err(|e| StorageError::from(e).into_core())
    }

    fn write_setting(
        conn: &mut SqliteConnection,
        key: &str,
        value: String,
    ) -> std::result::Result<(), StorageError> {
        diesel::replace_into(app_settings::table)
            .values(&AppSettingRow {
                setting_key: key.to_string(),
                setting_value: value,
            })
            .execute(conn)?;
        Ok(())
    }

    fn touch_meta(
        conn: &mut SqliteConnection,
        now_millis: i64,
    ) -> std::result::Result<(), StorageError> {
        diesel::replace_into(store_meta::table)
            .values((
                store_meta::meta_key.eq(META_MODIFIED_AT),
                store_meta::meta_value.eq(now_millis.to_string()),
            ))
            .execute(conn)?;
        Ok(())
    }

    fn read_current_quote(conn: &mut SqliteConnection) -> Result<QuoteRecord> {
        let text = Self::read_setting(conn, SETTING_QUOTE_TEXT)?.unwrap_or_default();
        let source = Self::read_setting(conn, SETTING_QUOTE_SOURCE)?.unwrap_or_default();
        let fetched_at = Self::read_setting(conn, SETTING_LAST_FETCHED_AT)?
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single());
        Ok(QuoteRecord {
            text,
            source,
            fetched_at,
        })
    }
}

#[async_trait]
impl QuoteStoreTrait for SqliteQuoteStore {
    fn get_current_quote(&self) -> Result<QuoteRecord> {
        let mut conn = get_connection(&self.pool)?;
        Self::read_current_quote(&mut conn)
    }

    async fn save_current_quote(&self, record: &QuoteRecord) -> Result<()> {
        let record = record.clone();
        let now_millis = self.clock.now_millis();
        self.writer
            .exec(move |conn| {
                Self::write_setting(conn, SETTING_QUOTE_TEXT, record.text.clone())
                    .map_err(StorageError::into_core)?;
                Self::write_setting(conn, SETTING_QUOTE_SOURCE, record.source.clone())
                    .map_err(StorageError::into_core)?;
                if let Some(fetched_at) = record.fetched_at {
                    Self::write_setting(
                        conn,
                        SETTING_LAST_FETCHED_AT,
                        fetched_at.timestamp_millis().to_string(),
                    )
                    .map_err(StorageError::into_core)?;
                }
                diesel::insert_into(quote_history::table)
                    .values(&NewHistoryRow {
                        quote_text: record.text.clone(),
                        quote_source: record.source.clone(),
                        digest: record.digest(),
                        recorded_at: record
                            .fetched_at
                            .map(|t| t.timestamp_millis())
                            .unwrap_or(now_millis),
                    })
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into_core())?;
                Self::touch_meta(conn, now_millis).map_err(StorageError::into_core)?;
                Ok(())
            })
            .await?;
        debug!("Persisted current quote and history entry");
        self.notify_observers();
        Ok(())
    }

    fn get_history(&self, limit: i64) -> Result<Vec<HistoryEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = quote_history::table
            .order(quote_history::id.desc())
            .limit(limit)
            .load::<HistoryRow>(&mut conn)
            .map_err(|e| StorageError::from(e).into_core())?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add_favorite(&self, text: &str, source: &str) -> Result<FavoriteQuote> {
        let text = text.to_string();
        let source = source.to_string();
        let now_millis = self.clock.now_millis();
        let favorite: FavoriteRow = self
            .writer
            .exec(move |conn| {
                let digest = quote_digest(&text, &source);
                let existing = favorite_quotes::table
                    .filter(favorite_quotes::digest.eq(&digest))
                    .first::<FavoriteRow>(conn)
                    .optional()
                    .map_err(|e| StorageError::from(e).into_core())?;
                if let Some(existing) = existing {
                    return Ok(existing);
                }
                diesel::insert_into(favorite_quotes::table)
                    .values(&NewFavoriteRow {
                        quote_text: text.clone(),
                        quote_source: source.clone(),
                        digest: digest.clone(),
                        created_at: now_millis,
                    })
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into_core())?;
                Self::touch_meta(conn, now_millis).map_err(StorageError::into_core)?;
                favorite_quotes::table
                    .filter(favorite_quotes::digest.eq(&digest))
                    .first::<FavoriteRow>(conn)
                    .map_err(|e| StorageError::from(e).into_core())
            })
            .await?;
        self.notify_observers();
        Ok(favorite.into())
    }

    async fn remove_favorite(&self, digest: &str) -> Result<()> {
        let digest = digest.to_string();
        let now_millis = self.clock.now_millis();
        let removed: usize = self
            .writer
            .exec(move |conn| {
                let removed = diesel::delete(
                    favorite_quotes::table.filter(favorite_quotes::digest.eq(&digest)),
                )
                .execute(conn)
                .map_err(|e| StorageError::from(e).into_core())?;
                if removed > 0 {
                    Self::touch_meta(conn, now_millis).map_err(StorageError::into_core)?;
                }
                Ok(removed)
            })
            .await?;
        if removed > 0 {
            self.notify_observers();
        }
        Ok(())
    }

    fn get_favorites(&self) -> Result<Vec<FavoriteQuote>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = favorite_quotes::table
            .order(favorite_quotes::id.asc())
            .load::<FavoriteRow>(&mut conn)
            .map_err(|e| StorageError::from(e).into_core())?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn is_favorite(&self, digest_param: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let count: i64 = favorite_quotes::table
            .filter(favorite_quotes::digest.eq(digest_param))
            .count()
            .get_result(&mut conn)
            .map_err(|e| StorageError::from(e).into_core())?;
        Ok(count > 0)
    }

    fn export_blob(&self) -> Result<Option<StoreSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        // One read transaction, so the export is a consistent snapshot
        // even while the writer actor is busy.
        let blob_and_modified = conn
            .transaction::<_, StorageError, _>(|conn| {
                let modified_at = store_meta::table
                    .filter(store_meta::meta_key.eq(META_MODIFIED_AT))
                    .select(store_meta::meta_value)
                    .first::<String>(conn)
                    .optional()?;
                let Some(modified_at) = modified_at.and_then(|raw| raw.parse::<i64>().ok()) else {
                    return Ok(None);
                };

                let current = Self::read_current_quote(conn).map_err(StorageError::Core)?;
                let history = quote_history::table
                    .order(quote_history::id.asc())
                    .load::<HistoryRow>(conn)?;
                let favorites = favorite_quotes::table
                    .order(favorite_quotes::id.asc())
                    .load::<FavoriteRow>(conn)?;

                let blob = StoreBlob {
                    version: STORE_BLOB_VERSION,
                    current,
                    history: history
                        .into_iter()
                        .map(|row| BlobQuote {
                            text: row.quote_text,
                            source: row.quote_source,
                            digest: row.digest,
                            timestamp: row.recorded_at,
                        })
                        .collect(),
                    favorites: favorites
                        .into_iter()
                        .map(|row| BlobQuote {
                            text: row.quote_text,
                            source: row.quote_source,
                            digest: row.digest,
                            timestamp: row.created_at,
                        })
                        .collect(),
                };
                Ok(Some((blob, modified_at)))
            })
            .map_err(StorageError::into_core)?;

        let Some((blob, modified_at_millis)) = blob_and_modified else {
            return Ok(None);
        };
        let bytes = serde_json::to_vec(&blob)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let content_hash = format!("{:x}", md5::compute(&bytes));
        let modified_at = Utc
            .timestamp_millis_opt(modified_at_millis)
            .single()
            .unwrap_or(chrono::DateTime::UNIX_EPOCH);
        Ok(Some(StoreSnapshot {
            bytes,
            fingerprint: ContentFingerprint {
                content_hash,
                modified_at,
            },
        }))
    }

    async fn import_blob(&self, bytes: &[u8]) -> Result<()> {
        let blob: StoreBlob = serde_json::from_slice(bytes)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        if blob.version != STORE_BLOB_VERSION {
            return Err(StorageError::UnsupportedBlobVersion(blob.version).into_core());
        }

        let now_millis = self.clock.now_millis();
        self.writer
            .exec(move |conn| {
                diesel::delete(quote_history::table)
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into_core())?;
                diesel::delete(favorite_quotes::table)
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into_core())?;

                for entry in &blob.history {
                    diesel::insert_into(quote_history::table)
                        .values(&NewHistoryRow {
                            quote_text: entry.text.clone(),
                            quote_source: entry.source.clone(),
                            digest: entry.digest.clone(),
                            recorded_at: entry.timestamp,
                        })
                        .execute(conn)
                        .map_err(|e| StorageError::from(e).into_core())?;
                }
                for entry in &blob.favorites {
                    diesel::insert_into(favorite_quotes::table)
                        .values(&NewFavoriteRow {
                            quote_text: entry.text.clone(),
                            quote_source: entry.source.clone(),
                            digest: entry.digest.clone(),
                            created_at: entry.timestamp,
                        })
                        .execute(conn)
                        .map_err(|e| StorageError::from(e).into_core())?;
                }

                Self::write_setting(conn, SETTING_QUOTE_TEXT, blob.current.text.clone())
                    .map_err(StorageError::into_core)?;
                Self::write_setting(conn, SETTING_QUOTE_SOURCE, blob.current.source.clone())
                    .map_err(StorageError::into_core)?;
                if let Some(fetched_at) = blob.current.fetched_at {
                    Self::write_setting(
                        conn,
                        SETTING_LAST_FETCHED_AT,
                        fetched_at.timestamp_millis().to_string(),
                    )
                    .map_err(StorageError::into_core)?;
                }
                Self::touch_meta(conn, now_millis).map_err(StorageError::into_core)?;
                Ok(())
            })
            .await?;
        debug!("Imported store blob ({} bytes)", bytes.len());
        self.notify_observers();
        Ok(())
    }

    fn register_observer(&self, observer: Arc<dyn StoreObserver>) {
        self.observers.lock().unwrap().push(observer);
    }
}
