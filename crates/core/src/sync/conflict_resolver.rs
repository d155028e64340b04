//! The sync conflict resolver.
//!
//! A pure decision function over the two replicas' fingerprints. Hash
//! equality is checked before any timestamp comparison: content
//! identity is authoritative, recency only breaks ties when content
//! differs. That way a completed push or pull with a skewed local clock
//! cannot cause a spurious reverse sync on the next pass.

use chrono::{DateTime, Utc};

use crate::quote::ContentFingerprint;
use crate::sync::{SyncDecision, SyncMarker};

/// Decide whether a sync pass should push, pull or do nothing.
///
/// `remote_modified_at` is the modification time of the remote object
/// itself, obtained by probing the remote store rather than read from
/// the cached marker. `None` means the object does not exist remotely.
///
/// Rules, in order:
/// 1. Never synced, or no trustworthy local content → `Pull`
///    (bootstrap: trust the remote).
/// 2. Local hash equals the last known remote hash → `NoOp`,
///    regardless of timestamps.
/// 3. Remote object strictly newer than the local content → `Pull`.
/// 4. Otherwise → `Push`.
pub fn resolve(
    local: Option<&ContentFingerprint>,
    marker: &SyncMarker,
    remote_modified_at: Option<DateTime<Utc>>,
) -> SyncDecision {
    let Some(local) = local else {
        return SyncDecision::Pull;
    };
    if marker.is_fresh() {
        return SyncDecision::Pull;
    }
    if local.content_hash == marker.last_known_remote_hash {
        return SyncDecision::NoOp;
    }
    match remote_modified_at {
        Some(remote) if remote > local.modified_at => SyncDecision::Pull,
        _ => SyncDecision::Push,
    }
}
