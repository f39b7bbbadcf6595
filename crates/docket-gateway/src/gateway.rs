//! The [`ChatGateway`] trait: docket's view of the chat platform.
//!
//! The engine only ever needs four capabilities from the platform:
//! send a prompt into a channel, decorate a sent prompt with a
//! control glyph, and subscribe to the two inbound event streams.
//! Everything else about the transport (connections, rate limits,
//! payload formats) stays behind implementations of this trait.

use crate::error::GatewayError;
use crate::event::{ControlGlyph, ReactionEvent, TextEvent};
use async_trait::async_trait;
use docket_types::{ChannelId, MessageId};
use tokio::sync::broadcast;

/// Handle to a prompt message this process sent.
///
/// Carries just enough identity to anchor reaction waits (the
/// message id) and follow-up sends (the channel id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptHandle {
    /// Channel the prompt was sent to.
    pub channel: ChannelId,
    /// Id the platform assigned to the prompt message.
    pub message: MessageId,
}

/// Abstract chat platform used by the dialogue engine.
///
/// # Event Streams
///
/// [`texts`](Self::texts) and [`reactions`](Self::reactions) return
/// broadcast receivers. Subscribing is cheap and each subscriber
/// sees every event from its subscription point onward; concurrent
/// sessions therefore never steal events from each other, they
/// simply filter the shared stream by their own predicates.
///
/// A receiver that falls far enough behind may observe a lagged
/// error and lose old events; waits treat that as a gap to ride
/// over, not a failure.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Sends a prompt message to a channel.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Closed`] if the gateway has shut
    /// down, or [`GatewayError::Upstream`] if the platform rejected
    /// the send.
    async fn send_prompt(
        &self,
        channel: ChannelId,
        text: &str,
    ) -> Result<PromptHandle, GatewayError>;

    /// Attaches a control glyph to a previously sent prompt.
    ///
    /// Shows the operator which controls are available (skip,
    /// cancel) as pre-seeded reactions they can click.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`send_prompt`](Self::send_prompt).
    async fn attach_glyph(
        &self,
        prompt: &PromptHandle,
        glyph: ControlGlyph,
    ) -> Result<(), GatewayError>;

    /// Subscribes to the stream of inbound text messages.
    fn texts(&self) -> broadcast::Receiver<TextEvent>;

    /// Subscribes to the stream of inbound reactions.
    fn reactions(&self) -> broadcast::Receiver<ReactionEvent>;
}
