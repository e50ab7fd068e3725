//! Command Routing
//!
//! Commands dispatch through an ordered chain of handlers registered per
//! command id, optionally filtered by the subject buffer's content type. A
//! handler either takes ownership of an invocation or reports `NotHandled`,
//! and the router advances to the next handler only in the latter case.

pub mod find_references;

use std::collections::HashMap;
use std::sync::Arc;

use crate::text::{TextBuffer, TextView};

/// Well-known command id for find-all-references.
pub const FIND_REFERENCES: &str = "references.findAll";

/// Availability of a command as reported by a handler chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Available,
    Unavailable,
}

/// Whether a handler took ownership of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Handled,
    NotHandled,
}

/// Invocation context: the view issuing the command and its subject buffer.
pub struct CommandArgs<'a> {
    pub view: &'a TextView,
    pub buffer: &'a TextBuffer,
}

/// One node in a command chain.
pub trait CommandHandler: Send + Sync {
    /// Availability as seen by this handler. `None` defers the decision to
    /// later handlers in the chain.
    fn query_state(&self, args: &CommandArgs<'_>) -> Option<CommandState>;

    fn execute(&self, args: &CommandArgs<'_>) -> CommandOutcome;
}

struct Route {
    content_type: Option<String>,
    handler: Arc<dyn CommandHandler>,
}

impl Route {
    fn matches(&self, buffer: &TextBuffer) -> bool {
        match &self.content_type {
            Some(content_type) => content_type == buffer.content_type(),
            None => true,
        }
    }
}

/// Routes command invocations through registered handler chains.
#[derive(Default)]
pub struct CommandRouter {
    routes: HashMap<String, Vec<Route>>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to a command's chain. `content_type` limits the
    /// handler to buffers of that content type; `None` matches any buffer.
    pub fn register(
        &mut self,
        command: &str,
        content_type: Option<&str>,
        handler: Arc<dyn CommandHandler>,
    ) {
        self.routes.entry(command.to_string()).or_default().push(Route {
            content_type: content_type.map(str::to_string),
            handler,
        });
    }

    /// Availability of a command: the first handler with an opinion wins.
    pub fn query_state(&self, command: &str, args: &CommandArgs<'_>) -> CommandState {
        if let Some(routes) = self.routes.get(command) {
            for route in routes.iter().filter(|r| r.matches(args.buffer)) {
                if let Some(state) = route.handler.query_state(args) {
                    return state;
                }
            }
        }
        CommandState::Available
    }

    /// Dispatch a command, advancing through the chain until a handler
    /// takes it.
    pub fn execute(&self, command: &str, args: &CommandArgs<'_>) -> CommandOutcome {
        let Some(routes) = self.routes.get(command) else {
            log::debug!("no handlers registered for command '{}'", command);
            return CommandOutcome::NotHandled;
        };

        for route in routes.iter().filter(|r| r.matches(args.buffer)) {
            if let CommandOutcome::Handled = route.handler.execute(args) {
                return CommandOutcome::Handled;
            }
        }
        CommandOutcome::NotHandled
    }
}
