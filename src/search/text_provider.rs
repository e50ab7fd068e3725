//! Built-in Text Search Provider
//!
//! Whole-token matching over a single document snapshot: the symbol at the
//! caret is taken to be the identifier token under it, and every occurrence
//! of that exact token is streamed to the wired presenter. Real language
//! providers replace this per language; it exists so the engine works out
//! of the box.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;

use super::context::SearchContext;
use super::provider::FindReferencesProvider;
use crate::language::LanguageDef;
use crate::present::{Location, Span, StreamingPresenter};
use crate::workspace::Document;

/// Identifier pattern used when a language does not define its own.
pub const DEFAULT_IDENTIFIER: &str = "[A-Za-z_][A-Za-z0-9_]*";

pub struct TextSearchProvider {
    identifier: Regex,
    presenter: Option<Arc<dyn StreamingPresenter>>,
}

impl TextSearchProvider {
    pub fn new() -> Self {
        Self::with_identifier(DEFAULT_IDENTIFIER).expect("default identifier pattern is valid")
    }

    /// Create a provider with a custom identifier token pattern
    pub fn with_identifier(pattern: &str) -> Result<Self> {
        Ok(Self {
            identifier: Regex::new(pattern)?,
            presenter: None,
        })
    }

    /// Create a provider using a language's identifier pattern, falling
    /// back to the engine default.
    pub fn for_language(def: &LanguageDef) -> Result<Self> {
        Self::with_identifier(def.identifier.as_deref().unwrap_or(DEFAULT_IDENTIFIER))
    }

    /// Wire the streaming presenter this provider drives. Without one the
    /// provider declines every request.
    pub fn with_presenter(mut self, presenter: Arc<dyn StreamingPresenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// The identifier token at `position`, if any.
    fn token_at(&self, text: &str, position: usize) -> Option<(String, Span)> {
        for m in self.identifier.find_iter(text) {
            if m.start() > position {
                break;
            }
            if position <= m.end() {
                return Some((m.as_str().to_string(), Span::new(m.start(), m.end())));
            }
        }
        None
    }
}

impl Default for TextSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FindReferencesProvider for TextSearchProvider {
    async fn try_find_references(
        &self,
        document: &Document,
        position: usize,
        ctx: &SearchContext,
    ) -> bool {
        if ctx.is_cancelled() {
            return false;
        }

        let Some(presenter) = &self.presenter else {
            log::debug!("text provider has no presenter wired, declining");
            return false;
        };

        let text = document.snapshot().text();
        let Some((token, _)) = self.token_at(text, position) else {
            log::debug!("no identifier token at offset {}", position);
            return false;
        };

        ctx.report(&format!("searching for `{}`", token));
        let mut session = presenter.begin(document.workspace(), &token);
        let mut found = 0usize;

        for m in self.identifier.find_iter(text) {
            if ctx.is_cancelled() {
                break;
            }
            if m.as_str() == token {
                found += 1;
                session.on_reference(
                    &token,
                    Location::new(document.path(), Span::new(m.start(), m.end())),
                );
            }
        }

        session.finish();
        log::debug!("found {} occurrences of `{}`", found, token);
        true
    }
}
