//! Blocking Operation Scope
//!
//! Runs a unit of work under a title/message/cancellation contract. The
//! caller blocks until the work completes; the work itself runs on a
//! background execution context and observes cancellation cooperatively.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::context::{LogSink, ProgressSink, SearchContext};

/// Static labels for a blocking operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationInfo {
    pub title: &'static str,
    pub message: &'static str,
    pub cancellable: bool,
}

/// Work unit executed by a [`BlockingScope`]. The scope supplies the
/// [`SearchContext`].
pub type ScopedAction = Box<dyn FnOnce(SearchContext) -> BoxFuture<'static, ()> + Send>;

/// Runs an action while blocking the caller until it completes or observes
/// cancellation. The scope never force-terminates the action; cancellation
/// is delivered through the action's context and must be observed by it.
pub trait BlockingScope: Send + Sync {
    fn run(&self, info: OperationInfo, action: ScopedAction);
}

/// Host hook for surfacing a running operation (wait dialog, status bar).
/// The token is handed out only for cancellable operations; cancelling it
/// is how user cancellation reaches the running action.
pub trait ScopeObserver: Send + Sync {
    fn operation_started(&self, info: &OperationInfo, cancel: Option<CancellationToken>);
    fn operation_finished(&self, info: &OperationInfo);
}

/// Production scope backed by a tokio runtime. `run` must be called from
/// outside the runtime's own worker threads, e.g. the host's interactive
/// thread.
pub struct RuntimeScope {
    handle: tokio::runtime::Handle,
    observer: Option<Arc<dyn ScopeObserver>>,
    progress: Arc<dyn ProgressSink>,
}

impl RuntimeScope {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle,
            observer: None,
            progress: Arc::new(LogSink),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScopeObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }
}

impl BlockingScope for RuntimeScope {
    fn run(&self, info: OperationInfo, action: ScopedAction) {
        let token = CancellationToken::new();

        if let Some(observer) = &self.observer {
            let cancel = info.cancellable.then(|| token.clone());
            observer.operation_started(&info, cancel);
        }
        log::debug!("{}: {}", info.title, info.message);

        let ctx = SearchContext::new(token, Arc::clone(&self.progress));
        let join = self.handle.spawn(action(ctx));
        if let Err(e) = self.handle.block_on(join) {
            log::error!("{} task failed: {}", info.title, e);
        }

        if let Some(observer) = &self.observer {
            observer.operation_finished(&info);
        }
    }
}
