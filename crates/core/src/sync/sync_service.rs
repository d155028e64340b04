//! Sync pass orchestration and the push/pull protocols.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::constants::SYNC_OBJECT_NAME;
use crate::errors::{Error, RemoteStoreError, Result, StoreError};
use crate::quote::{QuoteStoreTrait, StoreSnapshot};
use crate::sync::conflict_resolver::resolve;
use crate::sync::sync_traits::RemoteStoreTrait;
use crate::sync::{RemoteObjectMeta, RemoteObjectRef, SyncAccountManager, SyncDecision, SyncOutcome};

/// Runs sync passes against the remote store.
///
/// At most one pass per endpoint is in flight at a time; a pass
/// requested while one is running folds into it. A failed push or pull
/// leaves both the local fingerprint and the marker untouched, so the
/// next trigger re-evaluates from the same consistent baseline
/// (at-least-once, never partial).
pub struct SyncService {
    remote: Arc<dyn RemoteStoreTrait>,
    store: Arc<dyn QuoteStoreTrait>,
    accounts: Arc<SyncAccountManager>,
    in_flight: Mutex<()>,
}

impl SyncService {
    pub fn new(
        remote: Arc<dyn RemoteStoreTrait>,
        store: Arc<dyn QuoteStoreTrait>,
        accounts: Arc<SyncAccountManager>,
    ) -> Self {
        SyncService {
            remote,
            store,
            accounts,
            in_flight: Mutex::new(()),
        }
    }

    /// Run one resolver-driven sync pass.
    pub async fn sync_now(&self) -> Result<SyncOutcome> {
        if self.accounts.current_account()?.is_none() {
            debug!("No sync account linked, skipping sync pass");
            return Ok(SyncOutcome::NoAccount);
        }
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Sync pass already in progress, coalescing");
            return Ok(SyncOutcome::Coalesced);
        };

        debug!("Performing account sync...");
        let marker = self.accounts.marker()?;
        let snapshot = self.store.export_blob()?;
        let object = self.remote.find_object(SYNC_OBJECT_NAME).await?;
        let remote_modified_at = match &object {
            Some(object) => Some(self.remote.head(object).await?.modified_at),
            None => None,
        };

        let local = snapshot.as_ref().map(|s| &s.fingerprint);
        match (resolve(local, &marker, remote_modified_at), snapshot) {
            (SyncDecision::NoOp, _) => {
                debug!("Store not changed, no need to sync");
                Ok(SyncOutcome::UpToDate)
            }
            (SyncDecision::Push, Some(snapshot)) => self.push(snapshot, object).await,
            (SyncDecision::Push, None) => Err(Error::Unexpected(
                "push decided without local content".to_string(),
            )),
            (SyncDecision::Pull, _) => self.pull(object).await,
        }
    }

    /// Upload the local store unconditionally. Manual entry point; also
    /// the bootstrap for the first device, which has nothing to pull.
    pub async fn push_now(&self) -> Result<SyncOutcome> {
        if self.accounts.current_account()?.is_none() {
            return Ok(SyncOutcome::NoAccount);
        }
        let _guard = self.in_flight.lock().await;
        let snapshot = self
            .store
            .export_blob()?
            .ok_or_else(|| StoreError::NotFound("no local content to push".to_string()))?;
        let object = self.remote.find_object(SYNC_OBJECT_NAME).await?;
        self.push(snapshot, object).await
    }

    /// Download and import the remote store unconditionally. Manual
    /// entry point.
    pub async fn pull_now(&self) -> Result<SyncOutcome> {
        if self.accounts.current_account()?.is_none() {
            return Ok(SyncOutcome::NoAccount);
        }
        let _guard = self.in_flight.lock().await;
        let object = self.remote.find_object(SYNC_OBJECT_NAME).await?;
        self.pull(object).await
    }

    async fn push(
        &self,
        snapshot: StoreSnapshot,
        object: Option<RemoteObjectRef>,
    ) -> Result<SyncOutcome> {
        info!(
            "Pushing local store to remote ({} bytes)",
            snapshot.bytes.len()
        );
        let object = match object {
            Some(object) => object,
            None => {
                debug!("No existing backup object, creating {}", SYNC_OBJECT_NAME);
                self.remote.create_object(SYNC_OBJECT_NAME).await?
            }
        };
        let meta = self.remote.upload(&object, snapshot.bytes).await?;
        self.confirm(&meta).await?;
        info!("Push complete");
        Ok(SyncOutcome::Pushed)
    }

    async fn pull(&self, object: Option<RemoteObjectRef>) -> Result<SyncOutcome> {
        let Some(object) = object else {
            warn!("No backup object named {} on remote", SYNC_OBJECT_NAME);
            return Err(RemoteStoreError::ObjectNotFound(SYNC_OBJECT_NAME.to_string()).into());
        };
        info!("Pulling remote store into local replica");
        let (bytes, meta) = self.remote.download(&object).await?;
        self.store.import_blob(&bytes).await?;
        self.confirm(&meta).await?;
        info!("Pull complete");
        Ok(SyncOutcome::Pulled)
    }

    /// Persist the confirmed remote state as the new comparison
    /// baseline.
    async fn confirm(&self, meta: &RemoteObjectMeta) -> Result<()> {
        self.accounts
            .set_marker(&meta.content_hash, meta.modified_at.timestamp_millis())
            .await
    }
}
