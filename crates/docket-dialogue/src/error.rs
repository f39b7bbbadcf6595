//! Dialogue error types.

use docket_gateway::GatewayError;
use docket_types::{ActorId, ErrorCode};
use thiserror::Error;

/// Errors that unwind a field-collection session.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | `Cancelled` | `DIALOGUE_CANCELLED` | Yes |
/// | `AlreadyInSession` | `DIALOGUE_ALREADY_IN_SESSION` | Yes |
/// | `Gateway` | `DIALOGUE_GATEWAY` | Inner |
///
/// `Cancelled` is control flow, not a fault: the operator typed the
/// cancel keyword or clicked the cancel glyph. It is a dedicated
/// variant (rather than a reply value) so that `?` carries it out of
/// every nested wait and loop, guaranteeing the session aborts as a
/// whole.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// The operator aborted the session.
    #[error("cancelled by operator")]
    Cancelled,

    /// The actor already has a session in flight.
    #[error("{actor} already has a collection session in flight")]
    AlreadyInSession {
        /// The busy actor.
        actor: ActorId,
    },

    /// The gateway failed underneath the session.
    #[error("gateway failure: {0}")]
    Gateway(#[from] GatewayError),
}

impl DialogueError {
    /// Returns `true` if this is an operator cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl ErrorCode for DialogueError {
    fn code(&self) -> &'static str {
        match self {
            Self::Cancelled => "DIALOGUE_CANCELLED",
            Self::AlreadyInSession { .. } => "DIALOGUE_ALREADY_IN_SESSION",
            Self::Gateway(_) => "DIALOGUE_GATEWAY",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // The operator can simply start over
            Self::Cancelled => true,
            // The other session will finish
            Self::AlreadyInSession { .. } => true,
            Self::Gateway(inner) => inner.is_recoverable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_types::assert_error_codes;

    fn all_variants() -> Vec<DialogueError> {
        vec![
            DialogueError::Cancelled,
            DialogueError::AlreadyInSession {
                actor: ActorId::new(1),
            },
            DialogueError::Gateway(GatewayError::Closed),
        ]
    }

    #[test]
    fn error_codes_follow_convention() {
        assert_error_codes(&all_variants(), "DIALOGUE_");
    }

    #[test]
    fn cancellation_predicate() {
        assert!(DialogueError::Cancelled.is_cancelled());
        assert!(!DialogueError::AlreadyInSession {
            actor: ActorId::new(2)
        }
        .is_cancelled());
    }

    #[test]
    fn gateway_recoverability_delegates() {
        let closed = DialogueError::Gateway(GatewayError::Closed);
        assert!(!closed.is_recoverable());

        let upstream = DialogueError::Gateway(GatewayError::Upstream {
            status: 503,
            reason: "Service Unavailable".into(),
            body: String::new(),
            html: false,
        });
        assert!(upstream.is_recoverable());
    }

    #[test]
    fn gateway_error_converts() {
        let err: DialogueError = GatewayError::Closed.into();
        assert!(matches!(err, DialogueError::Gateway(GatewayError::Closed)));
    }
}
