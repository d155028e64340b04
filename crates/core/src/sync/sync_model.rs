//! Sync domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-endpoint sync baseline: the last remote state we confirmed.
///
/// Created when an endpoint is linked, reset to empty/-1 when the
/// endpoint is unlinked or replaced, and updated only after a confirmed
/// push or pull.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncMarker {
    /// Content hash the remote reported on the last confirmed sync.
    pub last_known_remote_hash: String,
    /// Remote modification time (epoch millis) of that sync; -1 means
    /// never synced.
    pub last_sync_timestamp: i64,
}

impl Default for SyncMarker {
    fn default() -> Self {
        Self {
            last_known_remote_hash: String::new(),
            last_sync_timestamp: -1,
        }
    }
}

impl SyncMarker {
    /// Whether this endpoint has never completed a sync.
    pub fn is_fresh(&self) -> bool {
        self.last_known_remote_hash.is_empty() || self.last_sync_timestamp < 0
    }
}

/// What one sync pass should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Replicas already agree.
    NoOp,
    /// Upload the local store to the remote.
    Push,
    /// Overwrite the local store from the remote.
    Pull,
}

/// How a sync pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No endpoint is linked; nothing was attempted.
    NoAccount,
    /// A pass was already in flight; this request folded into it.
    Coalesced,
    /// Replicas agree; nothing was transferred.
    UpToDate,
    Pushed,
    Pulled,
}

/// Handle to a named object on the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObjectRef {
    pub id: String,
    pub name: String,
}

/// Server-reported metadata for a remote object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObjectMeta {
    pub content_hash: String,
    pub modified_at: DateTime<Utc>,
}
