//! Find-References Orchestration Engine
//!
//! Routes a "find all references" request from a caret location to a
//! pluggable per-language search provider and dispatches results to a
//! presenter.
//!
//! This library provides:
//! - Command chain gating and routing
//! - Document and provider resolution
//! - A cancellable blocking search scope
//! - A deterministic fallback presentation policy

pub mod command;
pub mod config;
pub mod language;
pub mod present;
pub mod search;
pub mod text;
pub mod workspace;

// Re-exports for clean public API
pub use command::find_references::FindReferencesHandler;
pub use command::{
    CommandArgs, CommandHandler, CommandOutcome, CommandRouter, CommandState, FIND_REFERENCES,
};
pub use config::Config;
pub use language::{LanguageDef, LanguageRegistry};
pub use present::{ImmediatePresenter, Location, ReferencedSymbol, Span, StreamingPresenter};
pub use search::context::SearchContext;
pub use search::provider::{FindReferencesProvider, ProviderRegistry};
pub use search::scope::{BlockingScope, OperationInfo, RuntimeScope};
pub use search::text_provider::TextSearchProvider;
pub use text::{BufferId, Snapshot, TextBuffer, TextView};
pub use workspace::{Document, DocumentResolver, OpenDocuments, Workspace};
