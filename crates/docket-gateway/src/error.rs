//! Gateway error types.

use docket_types::ErrorCode;
use thiserror::Error;

/// Errors produced by a chat gateway.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | `Closed` | `GATEWAY_CLOSED` | No |
/// | `Upstream` | `GATEWAY_UPSTREAM` | Yes |
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The gateway has shut down; no more events will flow.
    #[error("gateway closed")]
    Closed,

    /// The platform rejected or failed a call.
    ///
    /// `html` marks responses whose body is an HTML error page
    /// (load balancer / CDN output) rather than an API payload;
    /// such bodies must not be shown to operators.
    #[error("upstream platform error: {status} {reason}")]
    Upstream {
        /// HTTP status returned by the platform.
        status: u16,
        /// Status reason phrase.
        reason: String,
        /// Response body text.
        body: String,
        /// `true` when the body is an HTML page, not an API payload.
        html: bool,
    },
}

impl ErrorCode for GatewayError {
    fn code(&self) -> &'static str {
        match self {
            Self::Closed => "GATEWAY_CLOSED",
            Self::Upstream { .. } => "GATEWAY_UPSTREAM",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Shutdown is final for this process
            Self::Closed => false,
            // Platform outages pass
            Self::Upstream { .. } => true,
        }
    }
}
