//! Command-layer errors.
//!
//! Everything a report command can fail with collapses into one
//! [`CommandError`]. The dispatch registry routes on its
//! [`kind`](CommandError::kind), never on the call site, so commands
//! just propagate with `?` and let the registry decide what, if
//! anything, the operator sees.

use crate::store::StoreError;
use docket_dialogue::DialogueError;
use docket_gateway::GatewayError;
use docket_types::{ActorId, ErrorCode};
use thiserror::Error;

/// What the operator asked for that was not there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    /// No report with the given id.
    Report,
    /// No reports filed against the given subject.
    Subject,
    /// The edit command named an unknown field.
    Field,
}

impl std::fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Report => "report",
            Self::Subject => "subject",
            Self::Field => "field",
        })
    }
}

/// Errors surfaced by the report commands.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | `Cancelled` | `CMD_CANCELLED` | Yes |
/// | `ValidationExhausted` | `CMD_VALIDATION_EXHAUSTED` | Yes |
/// | `NotFound` | `CMD_NOT_FOUND` | No |
/// | `NoEvidenceLinks` | `CMD_NO_EVIDENCE_LINKS` | No |
/// | `AlreadyInSession` | `CMD_ALREADY_IN_SESSION` | Yes |
/// | `PermissionDenied` | `CMD_PERMISSION_DENIED` | No |
/// | `UpstreamUnreachable` | `CMD_UPSTREAM_UNREACHABLE` | Yes |
/// | `Internal` | `CMD_INTERNAL` | No |
#[derive(Debug, Error)]
pub enum CommandError {
    /// The operator aborted the intake session.
    #[error("cancelled by operator")]
    Cancelled,

    /// Retry budget spent. Declared for the dispatch taxonomy but
    /// never produced: field retries are unbounded.
    #[error("validation attempts exhausted")]
    ValidationExhausted,

    /// The requested record, subject or field does not exist.
    #[error("{0} not found")]
    NotFound(NotFoundKind),

    /// An evidence-link removal was requested on a report without
    /// evidence links.
    #[error("report has no evidence links")]
    NoEvidenceLinks,

    /// The actor already has an intake session in flight.
    #[error("{actor} already has a report session in flight")]
    AlreadyInSession {
        /// The busy actor.
        actor: ActorId,
    },

    /// The actor is not allowed to run report commands.
    #[error("permission denied")]
    PermissionDenied,

    /// The chat platform rejected or failed a call.
    #[error("platform unreachable: {status} {reason}")]
    UpstreamUnreachable {
        /// HTTP status returned by the platform.
        status: u16,
        /// Status reason phrase.
        reason: String,
        /// Response body text.
        body: String,
        /// `true` when the body is an HTML page, unsafe to show.
        html: bool,
    },

    /// Unexpected failure from a collaborator.
    #[error("internal fault: {0}")]
    Internal(String),
}

impl CommandError {
    /// The dispatch kind this error routes under.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cancelled => ErrorKind::Cancelled,
            Self::ValidationExhausted => ErrorKind::ValidationExhausted,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NoEvidenceLinks => ErrorKind::NoEvidenceLinks,
            Self::AlreadyInSession { .. } => ErrorKind::AlreadyInSession,
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::UpstreamUnreachable { .. } => ErrorKind::UpstreamUnreachable,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl ErrorCode for CommandError {
    fn code(&self) -> &'static str {
        match self {
            Self::Cancelled => "CMD_CANCELLED",
            Self::ValidationExhausted => "CMD_VALIDATION_EXHAUSTED",
            Self::NotFound(_) => "CMD_NOT_FOUND",
            Self::NoEvidenceLinks => "CMD_NO_EVIDENCE_LINKS",
            Self::AlreadyInSession { .. } => "CMD_ALREADY_IN_SESSION",
            Self::PermissionDenied => "CMD_PERMISSION_DENIED",
            Self::UpstreamUnreachable { .. } => "CMD_UPSTREAM_UNREACHABLE",
            Self::Internal(_) => "CMD_INTERNAL",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::ValidationExhausted => true,
            Self::NotFound(_) => false,
            Self::NoEvidenceLinks => false,
            // The other session will finish
            Self::AlreadyInSession { .. } => true,
            Self::PermissionDenied => false,
            // Platform outages pass
            Self::UpstreamUnreachable { .. } => true,
            Self::Internal(_) => false,
        }
    }
}

impl From<DialogueError> for CommandError {
    fn from(err: DialogueError) -> Self {
        match err {
            DialogueError::Cancelled => Self::Cancelled,
            DialogueError::AlreadyInSession { actor } => Self::AlreadyInSession { actor },
            DialogueError::Gateway(GatewayError::Upstream {
                status,
                reason,
                body,
                html,
            }) => Self::UpstreamUnreachable {
                status,
                reason,
                body,
                html,
            },
            DialogueError::Gateway(inner @ GatewayError::Closed) => {
                Self::Internal(inner.to_string())
            }
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Closed dispatch taxonomy with an explicit specialization relation.
///
/// Each kind names at most one broader kind it specializes; resolving
/// an error walks from its own kind up this chain, most specific
/// first. [`ErrorKind::Command`] is the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operator cancellation.
    Cancelled,
    /// Retry budget spent (declared, never produced).
    ValidationExhausted,
    /// Requested record/subject/field absent.
    NotFound,
    /// Evidence-link removal with none on file.
    NoEvidenceLinks,
    /// Second session for a busy actor.
    AlreadyInSession,
    /// Actor not authorized.
    PermissionDenied,
    /// Chat platform unreachable.
    UpstreamUnreachable,
    /// Unexpected collaborator failure.
    Internal,
    /// Root of the taxonomy.
    Command,
}

impl ErrorKind {
    /// The broader kind this one specializes; `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self {
            Self::Cancelled
            | Self::ValidationExhausted
            | Self::NotFound
            | Self::AlreadyInSession
            | Self::PermissionDenied
            | Self::Internal => Some(Self::Command),
            Self::NoEvidenceLinks => Some(Self::NotFound),
            Self::UpstreamUnreachable => Some(Self::Internal),
            Self::Command => None,
        }
    }

    /// Iterates this kind and its ancestors, most specific first.
    pub fn chain(self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), Self::parent)
    }
}
