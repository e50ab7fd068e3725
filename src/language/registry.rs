//! Language Registry
//!
//! In-memory registry mapping file extensions and shebang interpreters to
//! language ids. Definitions come from the embedded default set plus any
//! user-provided TOML directories; later additions win.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::schema::{LanguageDef, LanguageFile};

/// Simple in-memory language registry
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: HashMap<String, LanguageDef>,
    by_extension: HashMap<String, String>,
    by_interpreter: HashMap<String, String>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a language to the registry, replacing any previous definition
    /// with the same name.
    pub fn add_language(&mut self, def: LanguageDef) {
        if let Some(old) = self.languages.remove(&def.name) {
            for ext in &old.extensions {
                let key = ext.to_ascii_lowercase();
                if self.by_extension.get(&key) == Some(&old.name) {
                    self.by_extension.remove(&key);
                }
            }
            for interpreter in &old.interpreters {
                if self.by_interpreter.get(interpreter) == Some(&old.name) {
                    self.by_interpreter.remove(interpreter);
                }
            }
        }

        for ext in &def.extensions {
            self.by_extension
                .insert(ext.to_ascii_lowercase(), def.name.clone());
        }
        for interpreter in &def.interpreters {
            self.by_interpreter
                .insert(interpreter.clone(), def.name.clone());
        }
        self.languages.insert(def.name.clone(), def);
    }

    /// Get a language definition by name
    pub fn get(&self, name: &str) -> Option<&LanguageDef> {
        self.languages.get(name)
    }

    /// List all registered language names
    pub fn list_languages(&self) -> Vec<&str> {
        self.languages.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Add the embedded default language set
    pub fn add_embedded_languages(&mut self) {
        let embedded_toml = include_str!("../../resources/languages.toml");

        match toml::from_str::<LanguageFile>(embedded_toml) {
            Ok(file) => {
                for def in file.languages {
                    self.add_language(def);
                }
            }
            Err(e) => {
                // Fallback to a minimal set if parsing fails
                log::warn!(
                    "Failed to parse embedded language definitions: {}. Using minimal fallback.",
                    e
                );
                self.add_minimal_languages();
            }
        }
    }

    /// Minimal fallback set in case embedded TOML parsing fails
    fn add_minimal_languages(&mut self) {
        self.add_language(LanguageDef {
            name: "rust".to_string(),
            extensions: vec!["rs".to_string()],
            interpreters: vec![],
            identifier: None,
        });
        self.add_language(LanguageDef {
            name: "plain".to_string(),
            extensions: vec!["txt".to_string()],
            interpreters: vec![],
            identifier: None,
        });
    }

    /// Merge language definitions from TOML files found in `dirs`.
    /// Missing directories are skipped; unreadable files are logged and
    /// skipped. Files from later directories override earlier definitions.
    pub fn load_from_dirs(&mut self, dirs: &[PathBuf]) {
        for dir in dirs {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(_) => continue,
            };

            let mut paths: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("toml"))
                .collect();
            paths.sort();

            for path in paths {
                if let Err(e) = self.load_file(&path) {
                    log::warn!("Skipping language file {}: {}", path.display(), e);
                }
            }
        }
    }

    fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let content = fs::read_to_string(path)?;
        let file: LanguageFile = toml::from_str(&content)?;
        for def in file.languages {
            log::debug!("Loaded language '{}' from {}", def.name, path.display());
            self.add_language(def);
        }
        Ok(())
    }

    /// Detect the language of a file from its path, falling back to shebang
    /// sniffing of the first content line.
    pub fn detect(&self, path: &Path, content: &str) -> Option<String> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if let Some(name) = self.by_extension.get(&ext.to_ascii_lowercase()) {
                return Some(name.clone());
            }
        }

        self.detect_shebang(content)
    }

    /// Detect a language from a shebang line, e.g. `#!/usr/bin/env python3`
    pub fn detect_shebang(&self, content: &str) -> Option<String> {
        let first_line = content.lines().next()?;
        let interpreter = extract_interpreter(first_line)?;
        self.by_interpreter.get(&interpreter).cloned()
    }
}

/// Pull the interpreter name out of a shebang line, resolving `env`
/// indirection.
fn extract_interpreter(line: &str) -> Option<String> {
    let rest = line.strip_prefix("#!")?;
    let mut parts = rest.split_whitespace();
    let program = parts.next()?;
    let program = program.rsplit('/').next().unwrap_or(program);

    if program == "env" {
        parts.next().map(str::to_string)
    } else {
        Some(program.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, extensions: &[&str], interpreters: &[&str]) -> LanguageDef {
        LanguageDef {
            name: name.to_string(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
            interpreters: interpreters.iter().map(|s| s.to_string()).collect(),
            identifier: None,
        }
    }

    #[test]
    fn test_detect_by_extension() {
        let mut registry = LanguageRegistry::new();
        registry.add_language(sample("rust", &["rs"], &[]));

        let detected = registry.detect(Path::new("src/lib.rs"), "fn main() {}");
        assert_eq!(detected.as_deref(), Some("rust"));
    }

    #[test]
    fn test_detect_by_shebang() {
        let mut registry = LanguageRegistry::new();
        registry.add_language(sample("python", &["py"], &["python", "python3"]));

        let detected = registry.detect(Path::new("tool"), "#!/usr/bin/env python3\nprint(1)\n");
        assert_eq!(detected.as_deref(), Some("python"));

        let direct = registry.detect(Path::new("tool"), "#!/usr/bin/python\n");
        assert_eq!(direct.as_deref(), Some("python"));
    }

    #[test]
    fn test_detect_unknown_is_none() {
        let mut registry = LanguageRegistry::new();
        registry.add_language(sample("rust", &["rs"], &[]));

        assert_eq!(registry.detect(Path::new("notes.md"), "# notes"), None);
    }

    #[test]
    fn test_redefinition_wins_and_clears_old_indexes() {
        let mut registry = LanguageRegistry::new();
        registry.add_language(sample("script", &["scr"], &["scr-run"]));
        registry.add_language(sample("script", &["script"], &[]));

        assert_eq!(
            registry
                .detect(Path::new("a.script"), "")
                .as_deref(),
            Some("script")
        );
        assert_eq!(registry.detect(Path::new("a.scr"), ""), None);
        assert_eq!(registry.detect_shebang("#!/usr/bin/scr-run"), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_embedded_languages_load() {
        let mut registry = LanguageRegistry::new();
        registry.add_embedded_languages();

        assert!(registry.get("rust").is_some());
        assert!(registry.get("python").is_some());
        assert_eq!(
            registry.detect(Path::new("main.rs"), "").as_deref(),
            Some("rust")
        );
    }

    #[test]
    fn test_extract_interpreter() {
        assert_eq!(
            extract_interpreter("#!/usr/bin/env python3"),
            Some("python3".to_string())
        );
        assert_eq!(
            extract_interpreter("#!/bin/bash"),
            Some("bash".to_string())
        );
        assert_eq!(extract_interpreter("fn main() {}"), None);
        assert_eq!(extract_interpreter("#!"), None);
    }
}
