//! Two-replica synchronization between the local content store and a
//! remote object store.

mod conflict_resolver;
mod sync_account;
mod sync_model;
mod sync_service;
mod sync_traits;
mod sync_trigger;

pub use conflict_resolver::resolve;
pub use sync_account::SyncAccountManager;
pub use sync_model::{RemoteObjectMeta, RemoteObjectRef, SyncDecision, SyncMarker, SyncOutcome};
pub use sync_service::SyncService;
pub use sync_traits::RemoteStoreTrait;
pub use sync_trigger::{SyncTrigger, DEFAULT_DEBOUNCE};
