//! Identifier types for docket.
//!
//! Actor, channel and message identifiers are 64-bit integers because
//! they are assigned by the chat platform (snowflake-style ids) and
//! only pass through this system. Report ids are assigned by the
//! persistence layer as a monotonic sequence. Session ids are local
//! UUIDs used for log correlation only.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a human operator on the chat platform.
///
/// An Actor is "who" is talking to the bot: the staff member issuing
/// a command and answering prompts. All event filtering and the
/// per-actor serialization guard key on this id.
///
/// # Example
///
/// ```
/// use docket_types::ActorId;
///
/// let staff = ActorId::new(4217);
/// assert_eq!(staff.value(), 4217);
/// assert_eq!(staff.to_string(), "actor:4217");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl ActorId {
    /// Creates an [`ActorId`] from a platform-assigned id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// Identifier for a chat channel.
///
/// A conversation (prompts and replies) is anchored to one channel.
/// Text events from other channels never match a session's predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl ChannelId {
    /// Creates a [`ChannelId`] from a platform-assigned id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chan:{}", self.0)
    }
}

/// Identifier for a single chat message.
///
/// Prompt messages carry one of these so that reaction events can be
/// matched against the exact prompt they answer. A reaction on any
/// other message is invisible to the wait that anchors here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Creates a [`MessageId`] from a platform-assigned id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}

/// Identifier for a committed report record.
///
/// Assigned by the store on insert, starting at 1, and shown to the
/// operator so they can look the report up or edit it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(pub u64);

impl ReportId {
    /// Creates a [`ReportId`] from a store-assigned sequence number.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "report:{}", self.0)
    }
}

/// Identifier for one field-collection session.
///
/// Exists for log correlation: every prompt, retry and acceptance
/// logged during one command invocation carries the same session id.
///
/// # Example
///
/// ```
/// use docket_types::SessionId;
///
/// let a = SessionId::new();
/// let b = SessionId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

#[allow(clippy::new_without_default)] // Default intentionally not implemented - see below
impl SessionId {
    /// Creates a new [`SessionId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

// NOTE: SessionId intentionally does NOT implement Default.
// A session id only has meaning when minted at session start; a
// Default::default() id would never appear in any session's logs.

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

// Tests are in lib.rs as integration tests for public API
