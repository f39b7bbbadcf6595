//! Inbound chat events and the reserved control glyphs.
//!
//! The platform delivers two independent event kinds: a text message
//! arriving in a channel, and a reaction being added to a message.
//! Both carry the acting operator's id so waits can filter on it.

use docket_types::{ActorId, ChannelId, MessageId};
use serde::{Deserialize, Serialize};

/// A reserved reaction glyph carrying control meaning.
///
/// Reactions are free-form strings on the wire; only these two are
/// recognized as control signals. Any other glyph is platform noise
/// and is ignored by waiting sessions.
///
/// | Glyph | Meaning |
/// |-------|---------|
/// | ✅ | Confirm: skip the current optional field |
/// | ❌ | Cancel: abort the whole session |
///
/// # Example
///
/// ```
/// use docket_gateway::ControlGlyph;
///
/// assert_eq!(ControlGlyph::parse("✅"), Some(ControlGlyph::Confirm));
/// assert_eq!(ControlGlyph::parse("❌"), Some(ControlGlyph::Cancel));
/// assert_eq!(ControlGlyph::parse("🎉"), None);
/// assert_eq!(ControlGlyph::Cancel.as_str(), "❌");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlGlyph {
    /// Confirm / skip signal.
    Confirm,
    /// Cancel / abort signal.
    Cancel,
}

impl ControlGlyph {
    /// The confirm glyph as sent over the wire.
    pub const CONFIRM: &'static str = "✅";
    /// The cancel glyph as sent over the wire.
    pub const CANCEL: &'static str = "❌";

    /// Recognizes a wire glyph as a control glyph.
    ///
    /// Returns `None` for anything that is not a reserved glyph.
    #[must_use]
    pub fn parse(glyph: &str) -> Option<Self> {
        match glyph {
            Self::CONFIRM => Some(Self::Confirm),
            Self::CANCEL => Some(Self::Cancel),
            _ => None,
        }
    }

    /// Returns the wire representation of this glyph.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirm => Self::CONFIRM,
            Self::Cancel => Self::CANCEL,
        }
    }

    /// Returns `true` if this is the confirm glyph.
    #[must_use]
    pub fn is_confirm(&self) -> bool {
        matches!(self, Self::Confirm)
    }

    /// Returns `true` if this is the cancel glyph.
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel)
    }
}

impl std::fmt::Display for ControlGlyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A text message arriving in a channel.
///
/// # Example
///
/// ```
/// use docket_gateway::TextEvent;
/// use docket_types::{ActorId, ChannelId, MessageId};
///
/// let ev = TextEvent::new(ActorId::new(1), ChannelId::new(9), MessageId::new(100), "grief");
/// assert_eq!(ev.content, "grief");
/// assert!(ev.attachments.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEvent {
    /// Who sent the message.
    pub actor: ActorId,
    /// Which channel it arrived in.
    pub channel: ChannelId,
    /// The message's own id.
    pub message: MessageId,
    /// Raw message text.
    pub content: String,
    /// URLs of files attached to the message.
    pub attachments: Vec<String>,
}

impl TextEvent {
    /// Creates a text event without attachments.
    #[must_use]
    pub fn new(
        actor: ActorId,
        channel: ChannelId,
        message: MessageId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            actor,
            channel,
            message,
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    /// Adds attachment URLs to the event.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }
}

/// A reaction added to a message.
///
/// The glyph is kept as the raw wire string; use [`control`] to
/// recognize the reserved glyphs.
///
/// [`control`]: ReactionEvent::control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Who reacted.
    pub actor: ActorId,
    /// Which message was reacted to.
    pub message: MessageId,
    /// The reaction glyph as sent over the wire.
    pub glyph: String,
}

impl ReactionEvent {
    /// Creates a reaction event.
    #[must_use]
    pub fn new(actor: ActorId, message: MessageId, glyph: impl Into<String>) -> Self {
        Self {
            actor,
            message,
            glyph: glyph.into(),
        }
    }

    /// Recognizes this reaction as a control glyph, if it is one.
    #[must_use]
    pub fn control(&self) -> Option<ControlGlyph> {
        ControlGlyph::parse(&self.glyph)
    }
}
