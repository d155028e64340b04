//! In-memory fakes shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use quotekeeper_core::constants::*;
use quotekeeper_core::errors::{RemoteStoreError, Result, StoreError};
use quotekeeper_core::quote::{
    quote_digest, ContentFingerprint, FavoriteQuote, HistoryEntry, QuoteRecord, QuoteStoreTrait,
    StoreObserver, StoreSnapshot,
};
use quotekeeper_core::scheduler::{ConnectivityStatus, ConnectivityTrait};
use quotekeeper_core::settings::{AppSettings, SettingsRepositoryTrait, SettingsUpdate};
use quotekeeper_core::sync::{RemoteObjectMeta, RemoteObjectRef, RemoteStoreTrait};
use quotekeeper_core::utils::{Clock, ManualClock};
use quotekeeper_providers::{ProviderError, QuoteData, QuoteProvider};

pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(test_epoch()))
}

// ---------------------------------------------------------------------
// Settings repository
// ---------------------------------------------------------------------

#[derive(Default)]
pub struct MemorySettingsRepository {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettingsRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl SettingsRepositoryTrait for MemorySettingsRepository {
    fn get_settings(&self) -> Result<AppSettings> {
        let values = self.values.lock().unwrap();
        let mut settings = AppSettings::default();
        if let Some(v) = values.get(SETTING_REFRESH_INTERVAL) {
            settings.refresh_interval_seconds = v.parse().unwrap_or(settings.refresh_interval_seconds);
        }
        if let Some(v) = values.get(SETTING_REFRESH_INTERVAL_OVERRIDE) {
            settings.refresh_interval_override = v.parse().unwrap_or(0);
        }
        if let Some(v) = values.get(SETTING_UNMETERED_ONLY) {
            settings.unmetered_only = v.parse().unwrap_or(false);
        }
        if let Some(v) = values.get(SETTING_REQUIRES_NETWORK) {
            settings.requires_network = v.parse().unwrap_or(true);
        }
        if let Some(v) = values.get(SETTING_SELECTED_PROVIDER) {
            settings.selected_provider = v.clone();
        }
        Ok(settings)
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        if let Some(interval) = update.refresh_interval_seconds {
            self.put(SETTING_REFRESH_INTERVAL, &interval.to_string());
        }
        if let Some(unmetered_only) = update.unmetered_only {
            self.put(SETTING_UNMETERED_ONLY, &unmetered_only.to_string());
        }
        Ok(())
    }

    fn get_setting(&self, setting_key: &str) -> Result<Option<String>> {
        Ok(self.get(setting_key))
    }

    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()> {
        self.put(setting_key, setting_value);
        Ok(())
    }

    async fn delete_setting(&self, setting_key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(setting_key);
        Ok(())
    }
}

// ---------------------------------------------------------------------
// Connectivity
// ---------------------------------------------------------------------

pub struct FakeConnectivity {
    status: Mutex<ConnectivityStatus>,
}

impl FakeConnectivity {
    pub fn new(connected: bool, metered: bool) -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(ConnectivityStatus { connected, metered }),
        })
    }

    pub fn set(&self, connected: bool, metered: bool) {
        *self.status.lock().unwrap() = ConnectivityStatus { connected, metered };
    }
}

impl ConnectivityTrait for FakeConnectivity {
    fn status(&self) -> ConnectivityStatus {
        *self.status.lock().unwrap()
    }
}

// ---------------------------------------------------------------------
// Quote store
// ---------------------------------------------------------------------

/// The deterministic envelope the fake store exports. Mirrors the
/// production layout closely enough for round-trip tests.
#[derive(Serialize, Deserialize, Default)]
struct FakeBlob {
    current: QuoteRecord,
    history: Vec<HistoryEntry>,
    favorites: Vec<FavoriteQuote>,
}

#[derive(Default)]
struct MemoryStoreState {
    current: QuoteRecord,
    history: Vec<HistoryEntry>,
    favorites: Vec<FavoriteQuote>,
    modified_at: Option<DateTime<Utc>>,
    fail_writes: bool,
}

pub struct MemoryQuoteStore {
    settings: Arc<MemorySettingsRepository>,
    clock: Arc<dyn Clock>,
    state: Mutex<MemoryStoreState>,
    observers: Mutex<Vec<Arc<dyn StoreObserver>>>,
}

impl MemoryQuoteStore {
    pub fn new(settings: Arc<MemorySettingsRepository>, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new(Self {
            settings,
            clock,
            state: Mutex::new(MemoryStoreState::default()),
            observers: Mutex::new(Vec::new()),
        })
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn history_len(&self) -> usize {
        self.state.lock().unwrap().history.len()
    }

    fn notify(&self) {
        for observer in self.observers.lock().unwrap().iter() {
            observer.on_store_changed();
        }
    }
}

#[async_trait]
impl QuoteStoreTrait for MemoryQuoteStore {
    fn get_current_quote(&self) -> Result<QuoteRecord> {
        Ok(self.state.lock().unwrap().current.clone())
    }

    async fn save_current_quote(&self, record: &QuoteRecord) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            if state.fail_writes {
                return Err(StoreError::QueryFailed("injected write failure".to_string()).into());
            }
            let id = state.history.len() as i32 + 1;
            state.history.push(HistoryEntry {
                id,
                text: record.text.clone(),
                source: record.source.clone(),
                digest: record.digest(),
                recorded_at: record.fetched_at.unwrap_or_else(|| self.clock.now()),
            });
            state.current = record.clone();
            state.modified_at = Some(self.clock.now());
        }
        self.settings.put(SETTING_QUOTE_TEXT, &record.text);
        self.settings.put(SETTING_QUOTE_SOURCE, &record.source);
        if let Some(fetched_at) = record.fetched_at {
            self.settings
                .put(SETTING_LAST_FETCHED_AT, &fetched_at.timestamp_millis().to_string());
        }
        self.notify();
        Ok(())
    }

    fn get_history(&self, limit: i64) -> Result<Vec<HistoryEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state.history.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn add_favorite(&self, text: &str, source: &str) -> Result<FavoriteQuote> {
        let favorite = {
            let mut state = self.state.lock().unwrap();
            let digest = quote_digest(text, source);
            if let Some(existing) = state.favorites.iter().find(|f| f.digest == digest) {
                existing.clone()
            } else {
                let favorite = FavoriteQuote {
                    id: state.favorites.len() as i32 + 1,
                    text: text.to_string(),
                    source: source.to_string(),
                    digest,
                    created_at: self.clock.now(),
                };
                state.favorites.push(favorite.clone());
                state.modified_at = Some(self.clock.now());
                favorite
            }
        };
        self.notify();
        Ok(favorite)
    }

    async fn remove_favorite(&self, digest: &str) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            state.favorites.retain(|f| f.digest != digest);
            state.modified_at = Some(self.clock.now());
        }
        self.notify();
        Ok(())
    }

    fn get_favorites(&self) -> Result<Vec<FavoriteQuote>> {
        Ok(self.state.lock().unwrap().favorites.clone())
    }

    fn is_favorite(&self, digest: &str) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .favorites
            .iter()
            .any(|f| f.digest == digest))
    }

    fn export_blob(&self) -> Result<Option<StoreSnapshot>> {
        let state = self.state.lock().unwrap();
        let Some(modified_at) = state.modified_at else {
            return Ok(None);
        };
        let blob = FakeBlob {
            current: state.current.clone(),
            history: state.history.clone(),
            favorites: state.favorites.clone(),
        };
        let bytes = serde_json::to_vec(&blob)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let content_hash = format!("{:x}", md5::compute(&bytes));
        Ok(Some(StoreSnapshot {
            bytes,
            fingerprint: ContentFingerprint {
                content_hash,
                modified_at,
            },
        }))
    }

    async fn import_blob(&self, bytes: &[u8]) -> Result<()> {
        let blob: FakeBlob = serde_json::from_slice(bytes)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        {
            let mut state = self.state.lock().unwrap();
            state.current = blob.current;
            state.history = blob.history;
            state.favorites = blob.favorites;
            state.modified_at = Some(self.clock.now());
        }
        self.notify();
        Ok(())
    }

    fn register_observer(&self, observer: Arc<dyn StoreObserver>) {
        self.observers.lock().unwrap().push(observer);
    }
}

// ---------------------------------------------------------------------
// Quote provider
// ---------------------------------------------------------------------

#[derive(Clone)]
pub enum ProviderBehavior {
    Succeed(QuoteData),
    Empty,
    Fail,
    /// Never completes; only ends by cancellation.
    Hang,
}

pub struct FakeProvider {
    behavior: Mutex<ProviderBehavior>,
    requires_network: bool,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(behavior: ProviderBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            requires_network: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_behavior(&self, behavior: ProviderBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }
}

#[async_trait]
impl QuoteProvider for FakeProvider {
    fn id(&self) -> &'static str {
        "fake"
    }

    fn display_name(&self) -> &'static str {
        "Fake"
    }

    fn requires_network(&self) -> bool {
        self.requires_network
    }

    async fn get_quote(&self) -> std::result::Result<QuoteData, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            ProviderBehavior::Succeed(quote) => Ok(quote),
            ProviderBehavior::Empty => Ok(QuoteData::default()),
            ProviderBehavior::Fail => Err(ProviderError::EmptyQuote("fake".to_string())),
            ProviderBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

// ---------------------------------------------------------------------
// Remote store
// ---------------------------------------------------------------------

struct RemoteState {
    object: Option<(RemoteObjectRef, Vec<u8>, DateTime<Utc>)>,
    fail: bool,
    next_id: u32,
}

pub struct FakeRemoteStore {
    clock: Arc<dyn Clock>,
    state: tokio::sync::Mutex<RemoteState>,
    pub find_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub find_delay: Mutex<Option<Duration>>,
}

impl FakeRemoteStore {
    pub fn new(clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new(Self {
            clock,
            state: tokio::sync::Mutex::new(RemoteState {
                object: None,
                fail: false,
                next_id: 1,
            }),
            find_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            find_delay: Mutex::new(None),
        })
    }

    pub async fn set_fail(&self, fail: bool) {
        self.state.lock().await.fail = fail;
    }

    pub fn set_find_delay(&self, delay: Option<Duration>) {
        *self.find_delay.lock().unwrap() = delay;
    }

    /// Overwrite the stored object's content out-of-band, as another
    /// device pushing would.
    pub async fn set_remote_content(&self, bytes: Vec<u8>, modified_at: DateTime<Utc>) {
        let mut state = self.state.lock().await;
        let object = state
            .object
            .as_ref()
            .map(|(object, _, _)| object.clone())
            .expect("no remote object to overwrite");
        state.object = Some((object, bytes, modified_at));
    }

    pub async fn stored_bytes(&self) -> Option<Vec<u8>> {
        self.state
            .lock()
            .await
            .object
            .as_ref()
            .map(|(_, bytes, _)| bytes.clone())
    }

    fn meta_for(bytes: &[u8], modified_at: DateTime<Utc>) -> RemoteObjectMeta {
        RemoteObjectMeta {
            content_hash: format!("{:x}", md5::compute(bytes)),
            modified_at,
        }
    }
}

#[async_trait]
impl RemoteStoreTrait for FakeRemoteStore {
    async fn find_object(&self, name: &str) -> Result<Option<RemoteObjectRef>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.find_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.lock().await;
        if state.fail {
            return Err(RemoteStoreError::api(503, "injected failure").into());
        }
        Ok(state
            .object
            .as_ref()
            .filter(|(object, _, _)| object.name == name)
            .map(|(object, _, _)| object.clone()))
    }

    async fn create_object(&self, name: &str) -> Result<RemoteObjectRef> {
        let mut state = self.state.lock().await;
        if state.fail {
            return Err(RemoteStoreError::api(503, "injected failure").into());
        }
        let object = RemoteObjectRef {
            id: format!("obj-{}", state.next_id),
            name: name.to_string(),
        };
        state.next_id += 1;
        state.object = Some((object.clone(), Vec::new(), self.clock.now()));
        Ok(object)
    }

    async fn upload(&self, object: &RemoteObjectRef, bytes: Vec<u8>) -> Result<RemoteObjectMeta> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        if state.fail {
            return Err(RemoteStoreError::api(503, "injected failure").into());
        }
        let modified_at = self.clock.now();
        let meta = Self::meta_for(&bytes, modified_at);
        state.object = Some((object.clone(), bytes, modified_at));
        Ok(meta)
    }

    async fn head(&self, object: &RemoteObjectRef) -> Result<RemoteObjectMeta> {
        let state = self.state.lock().await;
        if state.fail {
            return Err(RemoteStoreError::api(503, "injected failure").into());
        }
        match state.object.as_ref() {
            Some((stored, bytes, modified_at)) if stored.id == object.id => {
                Ok(Self::meta_for(bytes, *modified_at))
            }
            _ => Err(RemoteStoreError::ObjectNotFound(object.name.clone()).into()),
        }
    }

    async fn download(&self, object: &RemoteObjectRef) -> Result<(Vec<u8>, RemoteObjectMeta)> {
        let state = self.state.lock().await;
        if state.fail {
            return Err(RemoteStoreError::api(503, "injected failure").into());
        }
        match state.object.as_ref() {
            Some((stored, bytes, modified_at)) if stored.id == object.id => {
                Ok((bytes.clone(), Self::meta_for(bytes, *modified_at)))
            }
            _ => Err(RemoteStoreError::ObjectNotFound(object.name.clone()).into()),
        }
    }
}
