//! Insertion-ordered registry of quote providers.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::errors::ProviderError;
use crate::provider::fortune::FortuneProvider;
use crate::provider::freakuotes::FreakuotesProvider;
use crate::provider::hitokoto::HitokotoProvider;
use crate::provider::QuoteProvider;

/// Registry of quote providers keyed by their stable id.
///
/// Registration order is preserved so UIs can list providers in a
/// deterministic order. Looking up an unknown id returns
/// [`ProviderError::NotFound`].
pub struct ProviderRegistry {
    order: Vec<&'static str>,
    providers: HashMap<&'static str, Arc<dyn QuoteProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            providers: HashMap::new(),
        }
    }

    /// Create a registry populated with the built-in providers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HitokotoProvider::default()));
        registry.register(Arc::new(FreakuotesProvider::new()));
        registry.register(Arc::new(FortuneProvider::new()));
        registry
    }

    /// Register a provider. A provider with the same id replaces the
    /// earlier registration but keeps its original position.
    pub fn register(&mut self, provider: Arc<dyn QuoteProvider>) {
        let id = provider.id();
        debug!("Registering quote provider: {}", id);
        if self.providers.insert(id, provider).is_none() {
            self.order.push(id);
        }
    }

    /// Look up a provider by id.
    pub fn get(&self, id: &str) -> Result<Arc<dyn QuoteProvider>, ProviderError> {
        self.providers
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    /// Whether a provider with the given id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// All registered providers, in registration order.
    pub fn providers(&self) -> Vec<Arc<dyn QuoteProvider>> {
        self.order
            .iter()
            .filter_map(|id| self.providers.get(id).cloned())
            .collect()
    }

    /// Ids of all registered providers, in registration order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.order.clone()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
