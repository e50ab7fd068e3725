//! Workspace and Document Resolution
//!
//! Maps buffer snapshots back to the logical documents the host has open.
//! Resolution is synchronous, idempotent, and side-effect free; a snapshot
//! with no matching open document resolves to `None`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::language::LanguageRegistry;
use crate::text::{BufferId, Snapshot};

/// Owning project context for resolved documents.
#[derive(Debug)]
pub struct Workspace {
    name: String,
    root: PathBuf,
}

impl Workspace {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Immutable logical snapshot of a source file plus its owning workspace.
/// Once resolved, a document is never mutated.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    language: Option<String>,
    snapshot: Snapshot,
    workspace: Arc<Workspace>,
}

impl Document {
    pub fn new(
        path: impl Into<PathBuf>,
        language: Option<String>,
        snapshot: Snapshot,
        workspace: Arc<Workspace>,
    ) -> Self {
        Self {
            path: path.into(),
            language,
            snapshot,
            workspace,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detected source language, if any. Absence is a valid state.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn workspace(&self) -> &Arc<Workspace> {
        &self.workspace
    }
}

/// Maps a buffer snapshot to a logical document, or `None` if no open
/// document matches.
pub trait DocumentResolver: Send + Sync {
    fn resolve(&self, snapshot: &Snapshot) -> Option<Document>;
}

#[derive(Debug, Clone)]
struct OpenEntry {
    path: PathBuf,
    language: Option<String>,
}

/// Production resolver: the host's map of open files, keyed by buffer.
pub struct OpenDocuments {
    workspace: Arc<Workspace>,
    entries: RwLock<HashMap<BufferId, OpenEntry>>,
}

impl OpenDocuments {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            workspace,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn workspace(&self) -> &Arc<Workspace> {
        &self.workspace
    }

    /// Register an open file, detecting its language from path and content.
    pub fn open(
        &self,
        buffer: BufferId,
        path: impl Into<PathBuf>,
        content: &str,
        languages: &LanguageRegistry,
    ) {
        let path = path.into();
        let language = languages.detect(&path, content);
        self.open_with_language(buffer, path, language);
    }

    /// Register an open file with a known (or absent) language.
    pub fn open_with_language(
        &self,
        buffer: BufferId,
        path: impl Into<PathBuf>,
        language: Option<String>,
    ) {
        let path = path.into();
        log::debug!(
            "open {:?}: {} (language: {})",
            buffer,
            path.display(),
            language.as_deref().unwrap_or("none")
        );
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(buffer, OpenEntry { path, language });
        }
    }

    pub fn close(&self, buffer: BufferId) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(&buffer);
        }
    }

    pub fn is_open(&self, buffer: BufferId) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(&buffer))
            .unwrap_or(false)
    }
}

impl DocumentResolver for OpenDocuments {
    fn resolve(&self, snapshot: &Snapshot) -> Option<Document> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(&snapshot.buffer())?;
        Some(Document::new(
            entry.path.clone(),
            entry.language.clone(),
            snapshot.clone(),
            Arc::clone(&self.workspace),
        ))
    }
}
