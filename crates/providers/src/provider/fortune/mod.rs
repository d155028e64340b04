//! Fortune quote provider.
//!
//! Serves a random entry from a built-in collection, fortune(6)-style.
//! Works entirely offline, so it reports
//! [`requires_network`](crate::QuoteProvider::requires_network) as
//! `false` and is always eligible for a refresh regardless of
//! connectivity.

use async_trait::async_trait;
use rand::Rng;

use crate::errors::ProviderError;
use crate::models::QuoteData;
use crate::provider::QuoteProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "fortune";

/// Built-in fortune collection as (text, source) pairs.
const FORTUNES: &[(&str, &str)] = &[
    (
        "Simplicity is prerequisite for reliability.",
        "Edsger W. Dijkstra",
    ),
    (
        "There are two ways of constructing a software design: one way is to make it so simple that there are obviously no deficiencies, and the other way is to make it so complicated that there are no obvious deficiencies.",
        "C. A. R. Hoare",
    ),
    (
        "The purpose of computing is insight, not numbers.",
        "Richard Hamming",
    ),
    (
        "Deleted code is debugged code.",
        "Jeff Sickel",
    ),
    (
        "Programs must be written for people to read, and only incidentally for machines to execute.",
        "Abelson and Sussman",
    ),
    (
        "Controlling complexity is the essence of computer programming.",
        "Brian Kernighan",
    ),
    (
        "Premature optimization is the root of all evil.",
        "Donald Knuth",
    ),
    (
        "A distributed system is one in which the failure of a computer you didn't even know existed can render your own computer unusable.",
        "Leslie Lamport",
    ),
];

/// Fortune quote provider backed by the built-in collection.
pub struct FortuneProvider;

impl FortuneProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FortuneProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for FortuneProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Fortune"
    }

    fn requires_network(&self) -> bool {
        false
    }

    async fn get_quote(&self) -> Result<QuoteData, ProviderError> {
        let index = rand::thread_rng().gen_range(0..FORTUNES.len());
        let (text, source) = FORTUNES[index];
        Ok(QuoteData::new(text, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_non_empty_quote() {
        let provider = FortuneProvider::new();
        let quote = provider.get_quote().await.unwrap();
        assert!(!quote.is_empty());
        assert!(!quote.source.is_empty());
    }

    #[test]
    fn test_works_offline() {
        let provider = FortuneProvider::new();
        assert!(!provider.requires_network());
        assert_eq!(provider.minimum_refresh_interval(), 0);
    }
}
