//! Provider Capability and Registry
//!
//! Providers are looked up per document language. Absence of a provider is
//! a valid, non-error state; the orchestrator treats it as a silent no-op.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::context::SearchContext;
use crate::workspace::Document;

/// Language-specific capability answering a find-references request.
#[async_trait]
pub trait FindReferencesProvider: Send + Sync {
    /// Attempt to find references to the symbol at `position`.
    ///
    /// Returns `true` when the provider fully handled presentation itself,
    /// typically by driving a streaming presenter. Returns `false` when it
    /// declined or could not produce a synchronous result; the caller then
    /// applies its fallback policy.
    async fn try_find_references(
        &self,
        document: &Document,
        position: usize,
        ctx: &SearchContext,
    ) -> bool;
}

/// Explicit map from language id to provider, built at composition time.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn FindReferencesProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider for a language, replacing any previous one.
    pub fn register(
        &mut self,
        language: impl Into<String>,
        provider: Arc<dyn FindReferencesProvider>,
    ) {
        self.providers.insert(language.into(), provider);
    }

    /// Look up the provider for a document's language. `None` when the
    /// document has no language or no provider covers it.
    pub fn lookup(&self, document: &Document) -> Option<Arc<dyn FindReferencesProvider>> {
        let language = document.language()?;
        self.providers.get(language).cloned()
    }

    /// List all languages with a registered provider
    pub fn languages(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
