//! Search Execution
//!
//! The provider capability, the context it runs under, and the cancellable
//! blocking scope that hosts every find-references operation.

pub mod context;
pub mod provider;
pub mod scope;
pub mod text_provider;

pub use context::{LogSink, ProgressSink, SearchContext};
pub use provider::{FindReferencesProvider, ProviderRegistry};
pub use scope::{BlockingScope, OperationInfo, RuntimeScope, ScopeObserver, ScopedAction};
pub use text_provider::TextSearchProvider;
