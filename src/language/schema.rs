//! Language Schema Types
//!
//! Types for language definitions loaded from `languages.toml` files.

use serde::Deserialize;

/// Root language file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LanguageFile {
    #[serde(rename = "language")]
    pub languages: Vec<LanguageDef>,
}

/// A single language definition
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LanguageDef {
    pub name: String,
    /// File extensions claimed by this language, without the dot
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Interpreter names that identify this language in a shebang line
    #[serde(default)]
    pub interpreters: Vec<String>,
    /// Regex for identifier tokens; the engine default applies when absent
    pub identifier: Option<String>,
}

impl LanguageDef {
    /// Check if this language claims a file extension
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Check if this language claims a shebang interpreter
    pub fn matches_interpreter(&self, interpreter: &str) -> bool {
        self.interpreters.iter().any(|i| i == interpreter)
    }
}
