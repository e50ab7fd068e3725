//! Text Model
//!
//! Immutable buffer snapshots plus the minimal view surface the command
//! layer needs for caret resolution. The editing surface itself lives in
//! the host; this crate only ever reads snapshots.

use std::sync::Arc;

/// Identity of an open buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// Immutable point-in-time content of a buffer. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Snapshot {
    buffer: BufferId,
    version: u64,
    text: Arc<str>,
}

impl Snapshot {
    pub fn new(buffer: BufferId, version: u64, text: impl Into<Arc<str>>) -> Self {
        Self {
            buffer,
            version,
            text: text.into(),
        }
    }

    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the snapshot text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Mutable head of an open buffer. Every edit replaces the current snapshot
/// with a new one at the next version; snapshots already handed out are
/// unaffected.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    id: BufferId,
    content_type: String,
    current: Snapshot,
}

impl TextBuffer {
    pub fn new(id: BufferId, content_type: &str, text: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            content_type: content_type.to_string(),
            current: Snapshot::new(id, 0, text),
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Content type used by command routing filters (e.g. "source").
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Replace the buffer content, producing a new current snapshot.
    pub fn edit(&mut self, text: impl Into<Arc<str>>) {
        self.current = Snapshot::new(self.id, self.current.version() + 1, text);
    }
}

/// Caret location as seen by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub buffer: BufferId,
    pub offset: usize,
}

/// A view over buffers. The caret may be absent, or may live in a buffer
/// other than the one a command targets.
#[derive(Debug, Clone, Default)]
pub struct TextView {
    caret: Option<Caret>,
}

impl TextView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caret(buffer: BufferId, offset: usize) -> Self {
        Self {
            caret: Some(Caret { buffer, offset }),
        }
    }

    pub fn caret(&self) -> Option<Caret> {
        self.caret
    }

    /// Resolve the caret as a byte offset into `buffer`. `None` means the
    /// view has no determinate cursor in that buffer.
    pub fn caret_in(&self, buffer: &TextBuffer) -> Option<usize> {
        let caret = self.caret?;
        (caret.buffer == buffer.id()).then_some(caret.offset)
    }
}
