//! Store-change trigger for the sync subsystem.
//!
//! Observes content store mutations and asks the sync service to run a
//! pass "soon". Rapid bursts of notifications are debounced into a
//! single pass; the service itself coalesces a pass requested while one
//! is already running. Decouples store writes from network activity.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::quote::StoreObserver;
use crate::sync::SyncService;

/// Default quiet window before a burst of changes produces a sync pass.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(3);

pub struct SyncTrigger {
    tx: mpsc::UnboundedSender<()>,
}

impl SyncTrigger {
    /// Spawn the trigger's background task.
    ///
    /// The task waits for a change notification, drains further
    /// notifications until the store has been quiet for `debounce`,
    /// then runs one sync pass. It exits when the trigger is dropped.
    pub fn spawn(sync_service: Arc<SyncService>, debounce: Duration) -> Arc<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                loop {
                    match tokio::time::timeout(debounce, rx.recv()).await {
                        Ok(Some(())) => continue,
                        Ok(None) => return,
                        Err(_) => break,
                    }
                }
                debug!("Store changed, requesting sync...");
                match sync_service.sync_now().await {
                    Ok(outcome) => debug!("Sync pass finished: {:?}", outcome),
                    Err(e) => warn!("Sync pass failed: {}", e),
                }
            }
        });
        Arc::new(Self { tx })
    }

    /// Request a sync pass as if the store had changed.
    pub fn notify(&self) {
        let _ = self.tx.send(());
    }
}

impl StoreObserver for SyncTrigger {
    fn on_store_changed(&self) {
        self.notify();
    }
}
