//! The classified result of one dual-wait.
//!
//! A [`Reply`] is produced exclusively by
//! [`await_reply`](crate::combinator::await_reply); nothing else in
//! the engine constructs one outside of tests. Cancellation never
//! appears as a reply value: it unwinds as
//! [`DialogueError::Cancelled`](crate::DialogueError::Cancelled) so
//! that every enclosing loop aborts.

use serde::{Deserialize, Serialize};

/// A control signal that resolves a wait with a value.
///
/// Only Confirm exists here. The cancel glyph also resolves a wait,
/// but as an error, not a value, so it can unwind the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlSignal {
    /// The operator confirmed / skipped via the ✅ glyph.
    Confirm,
}

/// What the operator answered a prompt with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    /// A free-text message reply.
    Text {
        /// Raw message text.
        content: String,
        /// URLs of files attached to the message.
        attachments: Vec<String>,
    },
    /// A recognized control glyph reply.
    ControlSignal(ControlSignal),
}

impl Reply {
    /// Creates a text reply without attachments.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    /// Creates a text reply carrying attachment URLs.
    #[must_use]
    pub fn text_with_attachments(content: impl Into<String>, attachments: Vec<String>) -> Self {
        Self::Text {
            content: content.into(),
            attachments,
        }
    }

    /// Creates a confirm reply.
    #[must_use]
    pub fn confirm() -> Self {
        Self::ControlSignal(ControlSignal::Confirm)
    }

    /// Returns `true` if this is a confirm signal.
    #[must_use]
    pub fn is_confirm(&self) -> bool {
        matches!(self, Self::ControlSignal(ControlSignal::Confirm))
    }

    /// Returns the text content, if this is a text reply.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content, .. } => Some(content),
            Self::ControlSignal(_) => None,
        }
    }

    /// Returns the attachment URLs (empty for control signals).
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        match self {
            Self::Text { attachments, .. } => attachments,
            Self::ControlSignal(_) => &[],
        }
    }
}
