//! Find-References Orchestration
//!
//! The command handler that turns a caret location into a routed provider
//! call. It resolves the active document and the provider for its language,
//! runs the provider inside a cancellable blocking scope, and falls back to
//! an immediate presenter with an empty result set when the provider
//! declines. Every failure-like condition along the way is a silent no-op,
//! not an error.

use std::sync::Arc;

use crate::command::{CommandArgs, CommandHandler, CommandOutcome, CommandState};
use crate::present::ImmediatePresenter;
use crate::search::provider::ProviderRegistry;
use crate::search::scope::{BlockingScope, OperationInfo};
use crate::text::Snapshot;
use crate::workspace::DocumentResolver;

const OPERATION: OperationInfo = OperationInfo {
    title: "Find References",
    message: "Finding references...",
    cancellable: true,
};

/// Orchestrates find-all-references requests. All collaborators are
/// injected at composition time; the handler holds no mutable state and
/// every trigger is an independent operation.
pub struct FindReferencesHandler {
    resolver: Arc<dyn DocumentResolver>,
    providers: Arc<ProviderRegistry>,
    immediate_presenters: Vec<Arc<dyn ImmediatePresenter>>,
    scope: Arc<dyn BlockingScope>,
}

impl FindReferencesHandler {
    pub fn new(
        resolver: Arc<dyn DocumentResolver>,
        providers: Arc<ProviderRegistry>,
        immediate_presenters: Vec<Arc<dyn ImmediatePresenter>>,
        scope: Arc<dyn BlockingScope>,
    ) -> Self {
        Self {
            resolver,
            providers,
            immediate_presenters,
            scope,
        }
    }

    /// Run a find-references operation for the symbol at `position` in
    /// `snapshot`, blocking until it completes or the user cancels.
    ///
    /// Unresolvable documents and missing providers end the operation with
    /// no visible effect. A provider that declines triggers the fallback:
    /// the first registered immediate presenter receives the document's
    /// workspace and an empty result set; any further presenters are never
    /// invoked.
    pub fn trigger(&self, snapshot: &Snapshot, position: usize) {
        let resolver = Arc::clone(&self.resolver);
        let providers = Arc::clone(&self.providers);
        let presenters = self.immediate_presenters.clone();
        let snapshot = snapshot.clone();

        self.scope.run(
            OPERATION,
            Box::new(move |ctx| {
                Box::pin(async move {
                    let Some(document) = resolver.resolve(&snapshot) else {
                        log::debug!("no open document for {:?}", snapshot.buffer());
                        return;
                    };

                    let Some(provider) = providers.lookup(&document) else {
                        log::debug!(
                            "no references provider for language '{}'",
                            document.language().unwrap_or("none")
                        );
                        return;
                    };

                    log::debug!(
                        "find references in {} at offset {}",
                        document.path().display(),
                        position
                    );
                    let handled = provider.try_find_references(&document, position, &ctx).await;

                    // A cancelled operation ends here, before any fallback
                    // becomes visible.
                    if ctx.is_cancelled() {
                        log::debug!("find references cancelled");
                        return;
                    }

                    if !handled {
                        // Only the first registered immediate presenter
                        // receives the fallback result.
                        if let Some(presenter) = presenters.first() {
                            presenter.display(document.workspace(), &[]);
                        }
                    }
                })
            }),
        );
    }
}

impl CommandHandler for FindReferencesHandler {
    /// Never overrides the availability decision of later handlers.
    fn query_state(&self, _args: &CommandArgs<'_>) -> Option<CommandState> {
        None
    }

    /// Declines the command when the view has no determinate caret in the
    /// subject buffer; otherwise takes ownership and triggers the search.
    fn execute(&self, args: &CommandArgs<'_>) -> CommandOutcome {
        let Some(position) = args.view.caret_in(args.buffer) else {
            return CommandOutcome::NotHandled;
        };

        self.trigger(args.buffer.current(), position);
        CommandOutcome::Handled
    }
}
