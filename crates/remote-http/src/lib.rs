//! HTTP implementation of quotekeeper's remote object store.
//!
//! Talks to a minimal named-object REST API: objects are listed by
//! name, created, and their byte content uploaded or downloaded; the
//! server reports a content hash and modification time for every stored
//! object. Any service exposing this shape can back the sync
//! subsystem.

mod client;

pub use client::ObjectStoreClient;
