//! Data models shared by all quote providers.

mod quote;

pub use quote::QuoteData;
