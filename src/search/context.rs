//! Search Context
//!
//! Handed to providers by the blocking scope: a monotonic cancellation
//! signal plus a sink for progress while a search runs.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Receives human-readable progress updates from a running search.
pub trait ProgressSink: Send + Sync {
    fn message(&self, text: &str);
}

/// Default sink: progress goes to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn message(&self, text: &str) {
        log::debug!("search: {}", text);
    }
}

/// Cancellation signal and progress sink for one provider invocation.
#[derive(Clone)]
pub struct SearchContext {
    cancellation: CancellationToken,
    progress: Arc<dyn ProgressSink>,
}

impl SearchContext {
    pub fn new(cancellation: CancellationToken, progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            cancellation,
            progress,
        }
    }

    /// Whether cancellation has been requested. Once cancelled, stays
    /// cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Completes when cancellation is requested.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Report a progress message to the host.
    pub fn report(&self, text: &str) {
        self.progress.message(text);
    }
}
