//! Quotekeeper Providers Crate
//!
//! This crate provides source-agnostic quote fetching capabilities for
//! the quotekeeper application.
//!
//! # Overview
//!
//! A quote provider is anything that can produce a short piece of text
//! and its attribution: a JSON API, a scraped web page, or a local
//! collection that needs no network at all. Providers are registered in
//! a [`ProviderRegistry`] keyed by a stable id; the refresh pipeline
//! looks up the currently selected provider and calls
//! [`QuoteProvider::get_quote`] on a background task.
//!
//! # Core Types
//!
//! - [`QuoteProvider`] - Trait implemented by every quote source
//! - [`QuoteData`] - The fetched text/source/author triple
//! - [`ProviderRegistry`] - Insertion-ordered registry of providers
//! - [`ProviderError`] - Error type for fetch and lookup failures

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::ProviderError;
pub use models::QuoteData;
pub use provider::fortune::FortuneProvider;
pub use provider::freakuotes::FreakuotesProvider;
pub use provider::hitokoto::HitokotoProvider;
pub use provider::{http_client, QuoteProvider};
pub use registry::ProviderRegistry;
