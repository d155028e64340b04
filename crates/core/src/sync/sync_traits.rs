//! Remote store contract.

use async_trait::async_trait;

use super::{RemoteObjectMeta, RemoteObjectRef};
use crate::errors::Result;

/// Trait for the remote object store.
///
/// Objects are named, carry opaque byte content, and report a
/// server-assigned content hash and modification time on read. No wire
/// format beyond that is assumed.
#[async_trait]
pub trait RemoteStoreTrait: Send + Sync {
    /// Locate an object by its well-known name.
    async fn find_object(&self, name: &str) -> Result<Option<RemoteObjectRef>>;

    /// Create an empty object with the given name.
    async fn create_object(&self, name: &str) -> Result<RemoteObjectRef>;

    /// Replace the object's content, returning the server-assigned
    /// hash and modification time of the stored bytes.
    async fn upload(&self, object: &RemoteObjectRef, bytes: Vec<u8>) -> Result<RemoteObjectMeta>;

    /// Fetch the object's metadata without downloading its content.
    async fn head(&self, object: &RemoteObjectRef) -> Result<RemoteObjectMeta>;

    /// Download the object's content together with its metadata.
    async fn download(&self, object: &RemoteObjectRef) -> Result<(Vec<u8>, RemoteObjectMeta)>;
}
