//! Language Definitions
//!
//! Registry of language metadata. The language id detected for an open
//! document is the key used for provider lookup.

pub mod registry;
pub mod schema;

pub use registry::LanguageRegistry;
pub use schema::{LanguageDef, LanguageFile};
