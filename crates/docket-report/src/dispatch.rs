//! Error dispatch registry.
//!
//! Maps [`ErrorKind`]s to handlers that turn a concrete
//! [`CommandError`] into the text (if any) the operator should see.
//! Resolution walks the error's kind chain most-specific-first, so a
//! handler on a broad kind covers every unregistered specialization
//! beneath it, and the root [`ErrorKind::Command`] handler covers
//! everything.
//!
//! The table is built once at startup; after that it is read-only.
//! Registering the same kind twice is last-write-wins, which is fine
//! at a single controlled initialization point.
//!
//! Two distinct "say nothing" outcomes exist and both mean suppress:
//! no handler anywhere in the chain, and a handler that returns
//! `None` (used for permission failures, where any reply would leak
//! which commands exist).

use crate::error::{CommandError, ErrorKind, NotFoundKind};
use std::collections::HashMap;

/// Fixed operator-facing text for unexpected failures. Deliberately
/// reveals nothing about the fault.
pub const INTERNAL_ERROR: &str =
    "Something unexpected went wrong during command execution. Please try again later.";

/// Fixed acknowledgement for operator cancellation.
pub const CANCELLED: &str = "Successfully cancelled.";

type Handler = Box<dyn Fn(&CommandError) -> Option<String> + Send + Sync>;

/// Build-time table from error kinds to response handlers.
pub struct DispatchRegistry {
    handlers: HashMap<ErrorKind, Handler>,
}

impl DispatchRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Creates a registry populated with the default handler table.
    ///
    /// | Kind | Response |
    /// |------|----------|
    /// | `Cancelled` | fixed acknowledgement |
    /// | `NotFound` | per-[`NotFoundKind`] text |
    /// | `NoEvidenceLinks` | dedicated text |
    /// | `AlreadyInSession` | "finish your current report first" |
    /// | `PermissionDenied` | suppressed (`None`) |
    /// | `UpstreamUnreachable` | status + body when safe, else generic |
    /// | `Command` (root) | logged, generic text |
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(ErrorKind::Cancelled, |_| Some(CANCELLED.to_string()));

        registry.register(ErrorKind::NotFound, |err| {
            Some(match err {
                CommandError::NotFound(NotFoundKind::Report) => {
                    "No report by that ID was found!".to_string()
                }
                CommandError::NotFound(NotFoundKind::Subject) => {
                    "Username not in database.".to_string()
                }
                CommandError::NotFound(NotFoundKind::Field) => {
                    "No such report field. Fields: username, type, image links, blocks, \
                     summary, happened at, punishment."
                        .to_string()
                }
                other => format!("{other} was not found."),
            })
        });

        registry.register(ErrorKind::NoEvidenceLinks, |_| {
            Some("There are no evidence links to remove for this report!".to_string())
        });

        registry.register(ErrorKind::AlreadyInSession, |_| {
            Some(
                "You already have a report session in progress. Finish or cancel it first."
                    .to_string(),
            )
        });

        // Silent: replying would reveal which commands exist.
        registry.register(ErrorKind::PermissionDenied, |_| None);

        registry.register(ErrorKind::UpstreamUnreachable, |err| {
            if let CommandError::UpstreamUnreachable {
                status,
                reason,
                body,
                html,
            } = err
            {
                tracing::warn!(status, reason = %reason, "chat platform unreachable");
                // HTML bodies are load-balancer error pages, far too
                // big and unreadable to show.
                let body = if *html { "" } else { body.as_str() };
                Some(format!("Unable to reach the chat platform: {status} {reason} {body}").trim_end().to_string())
            } else {
                Some(INTERNAL_ERROR.to_string())
            }
        });

        // Root: anything without a more specific handler lands here.
        registry.register(ErrorKind::Command, |err| {
            tracing::error!(error = %err, "unhandled command error");
            Some(INTERNAL_ERROR.to_string())
        });

        registry
    }

    /// Registers a handler for one kind. Last write wins.
    pub fn register<F>(&mut self, kind: ErrorKind, handler: F)
    where
        F: Fn(&CommandError) -> Option<String> + Send + Sync + 'static,
    {
        if self.handlers.insert(kind, Box::new(handler)).is_some() {
            tracing::debug!(?kind, "dispatch handler replaced");
        }
    }

    /// Resolves an error to the text the operator should see.
    ///
    /// Walks the error's kind chain most-specific-first and runs the
    /// first registered handler. `None` means suppress: either no
    /// handler exists anywhere in the chain, or the handler chose
    /// silence.
    #[must_use]
    pub fn resolve(&self, error: &CommandError) -> Option<String> {
        let handler = error.kind().chain().find_map(|kind| self.handlers.get(&kind))?;
        handler(error)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for DispatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DispatchRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
