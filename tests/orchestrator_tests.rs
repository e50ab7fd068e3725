//! End-to-end tests for the find-references orchestration policy.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use findrefs::present::{ImmediatePresenter, ReferencedSymbol};
use findrefs::search::context::SearchContext;
use findrefs::search::provider::{FindReferencesProvider, ProviderRegistry};
use findrefs::search::scope::{OperationInfo, RuntimeScope, ScopeObserver};
use findrefs::text::{BufferId, Snapshot};
use findrefs::workspace::{Document, DocumentResolver, Workspace};
use findrefs::FindReferencesHandler;

struct TestResolver {
    workspace: Arc<Workspace>,
    language: Option<String>,
    known: bool,
    calls: AtomicUsize,
}

impl TestResolver {
    fn resolving(language: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            workspace: Arc::new(Workspace::new("test", "/tmp/test")),
            language: language.map(str::to_string),
            known: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn unresolving() -> Arc<Self> {
        Arc::new(Self {
            workspace: Arc::new(Workspace::new("test", "/tmp/test")),
            language: None,
            known: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DocumentResolver for TestResolver {
    fn resolve(&self, snapshot: &Snapshot) -> Option<Document> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.known.then(|| {
            Document::new(
                "/tmp/test/src/lib.rs",
                self.language.clone(),
                snapshot.clone(),
                Arc::clone(&self.workspace),
            )
        })
    }
}

struct TestProvider {
    handled: bool,
    wait_for_cancel: bool,
    calls: AtomicUsize,
}

impl TestProvider {
    fn handling() -> Arc<Self> {
        Arc::new(Self {
            handled: true,
            wait_for_cancel: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn declining() -> Arc<Self> {
        Arc::new(Self {
            handled: false,
            wait_for_cancel: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn declining_after_cancel() -> Arc<Self> {
        Arc::new(Self {
            handled: false,
            wait_for_cancel: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FindReferencesProvider for TestProvider {
    async fn try_find_references(
        &self,
        _document: &Document,
        _position: usize,
        ctx: &SearchContext,
    ) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.wait_for_cancel {
            ctx.cancelled().await;
        }
        self.handled
    }
}

#[derive(Default)]
struct CountingPresenter {
    calls: AtomicUsize,
    last_len: AtomicUsize,
}

impl CountingPresenter {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_len(&self) -> usize {
        self.last_len.load(Ordering::SeqCst)
    }
}

impl ImmediatePresenter for CountingPresenter {
    fn display(&self, _workspace: &Workspace, references: &[ReferencedSymbol]) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_len.store(references.len(), Ordering::SeqCst);
    }
}

/// Cancels the operation as soon as it starts, like a user hitting escape
/// immediately.
struct CancelOnStart;

impl ScopeObserver for CancelOnStart {
    fn operation_started(&self, _info: &OperationInfo, cancel: Option<CancellationToken>) {
        if let Some(token) = cancel {
            token.cancel();
        }
    }

    fn operation_finished(&self, _info: &OperationInfo) {}
}

fn registry_with(language: &str, provider: Arc<TestProvider>) -> Arc<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    registry.register(language, provider);
    Arc::new(registry)
}

fn snapshot() -> Snapshot {
    Snapshot::new(BufferId(1), 0, "fn main() { run(); }")
}

#[test]
fn unresolved_document_is_a_silent_noop() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let resolver = TestResolver::unresolving();
    let provider = TestProvider::declining();
    let presenter = Arc::new(CountingPresenter::default());

    let handler = FindReferencesHandler::new(
        resolver.clone(),
        registry_with("rust", provider.clone()),
        vec![presenter.clone()],
        Arc::new(RuntimeScope::new(runtime.handle().clone())),
    );

    handler.trigger(&snapshot(), 3);

    assert_eq!(resolver.calls(), 1);
    assert_eq!(provider.calls(), 0);
    assert_eq!(presenter.calls(), 0);
}

#[test]
fn missing_provider_is_a_silent_noop() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let resolver = TestResolver::resolving(Some("gcode"));
    let presenter = Arc::new(CountingPresenter::default());

    let handler = FindReferencesHandler::new(
        resolver,
        Arc::new(ProviderRegistry::new()),
        vec![presenter.clone()],
        Arc::new(RuntimeScope::new(runtime.handle().clone())),
    );

    handler.trigger(&snapshot(), 5);

    assert_eq!(presenter.calls(), 0);
}

#[test]
fn document_without_language_is_a_silent_noop() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let resolver = TestResolver::resolving(None);
    let provider = TestProvider::declining();
    let presenter = Arc::new(CountingPresenter::default());

    let handler = FindReferencesHandler::new(
        resolver,
        registry_with("rust", provider.clone()),
        vec![presenter.clone()],
        Arc::new(RuntimeScope::new(runtime.handle().clone())),
    );

    handler.trigger(&snapshot(), 3);

    assert_eq!(provider.calls(), 0);
    assert_eq!(presenter.calls(), 0);
}

#[test]
fn handling_provider_owns_presentation() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let resolver = TestResolver::resolving(Some("rust"));
    let provider = TestProvider::handling();
    let presenter = Arc::new(CountingPresenter::default());

    let handler = FindReferencesHandler::new(
        resolver,
        registry_with("rust", provider.clone()),
        vec![presenter.clone()],
        Arc::new(RuntimeScope::new(runtime.handle().clone())),
    );

    handler.trigger(&snapshot(), 3);

    assert_eq!(provider.calls(), 1);
    assert_eq!(presenter.calls(), 0);
}

#[test]
fn declining_provider_falls_back_to_first_presenter_only() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let resolver = TestResolver::resolving(Some("rust"));
    let provider = TestProvider::declining();
    let first = Arc::new(CountingPresenter::default());
    let second = Arc::new(CountingPresenter::default());

    let handler = FindReferencesHandler::new(
        resolver,
        registry_with("rust", provider.clone()),
        vec![first.clone(), second.clone()],
        Arc::new(RuntimeScope::new(runtime.handle().clone())),
    );

    handler.trigger(&snapshot(), 3);

    assert_eq!(provider.calls(), 1);
    assert_eq!(first.calls(), 1);
    assert_eq!(first.last_len(), 0);
    assert_eq!(second.calls(), 0);
}

#[test]
fn declining_provider_with_no_presenters_is_a_noop() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let resolver = TestResolver::resolving(Some("rust"));
    let provider = TestProvider::declining();

    let handler = FindReferencesHandler::new(
        resolver,
        registry_with("rust", provider.clone()),
        Vec::new(),
        Arc::new(RuntimeScope::new(runtime.handle().clone())),
    );

    // Nothing to display to; the operation still completes quietly.
    handler.trigger(&snapshot(), 3);

    assert_eq!(provider.calls(), 1);
}

#[test]
fn cancellation_before_provider_returns_suppresses_all_presenters() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let resolver = TestResolver::resolving(Some("rust"));
    let provider = TestProvider::declining_after_cancel();
    let presenter = Arc::new(CountingPresenter::default());

    let scope = RuntimeScope::new(runtime.handle().clone()).with_observer(Arc::new(CancelOnStart));
    let handler = FindReferencesHandler::new(
        resolver,
        registry_with("rust", provider.clone()),
        vec![presenter.clone()],
        Arc::new(scope),
    );

    handler.trigger(&snapshot(), 3);

    assert_eq!(provider.calls(), 1);
    assert_eq!(presenter.calls(), 0);
}

#[test]
fn repeated_triggers_are_independent() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let resolver = TestResolver::resolving(Some("rust"));
    let provider = TestProvider::declining();
    let presenter = Arc::new(CountingPresenter::default());

    let handler = FindReferencesHandler::new(
        resolver.clone(),
        registry_with("rust", provider.clone()),
        vec![presenter.clone()],
        Arc::new(RuntimeScope::new(runtime.handle().clone())),
    );

    handler.trigger(&snapshot(), 3);
    handler.trigger(&snapshot(), 7);

    assert_eq!(resolver.calls(), 2);
    assert_eq!(provider.calls(), 2);
    assert_eq!(presenter.calls(), 2);
}
