//! In-process gateway for the console frontend and tests.
//!
//! The [`LoopbackGateway`] implements [`ChatGateway`] without any
//! network: outbound prompts flow into an mpsc queue read by the
//! frontend, and inbound events are injected by the frontend (or a
//! test) into broadcast channels the engine subscribes to.
//!
//! ```text
//! ┌──────────────┐  inject_text / inject_reaction   ┌──────────────┐
//! │   Frontend   │ ───────────────────────────────► │   Loopback   │ ──► broadcast ──► sessions
//! │ (console or  │                                  │   Gateway    │
//! │    test)     │ ◄─────────────────────────────── │              │ ◄── send_prompt ── sessions
//! └──────────────┘        OutboundHandle            └──────────────┘
//! ```

use crate::error::GatewayError;
use crate::event::{ControlGlyph, ReactionEvent, TextEvent};
use crate::gateway::{ChatGateway, PromptHandle};
use async_trait::async_trait;
use docket_types::{ActorId, ChannelId, MessageId};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, mpsc};

/// Default buffer size for loopback channels.
pub const DEFAULT_BUFFER_SIZE: usize = 64;

/// Something the engine sent out through the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A prompt message posted to a channel.
    Prompt {
        /// Handle the engine received back.
        handle: PromptHandle,
        /// Prompt text.
        text: String,
    },
    /// A control glyph attached to a previously posted prompt.
    Glyph {
        /// The prompt message decorated.
        message: MessageId,
        /// Which glyph was attached.
        glyph: ControlGlyph,
    },
}

/// In-process [`ChatGateway`] implementation.
///
/// Message ids are allocated from a private counter so every prompt
/// and injected message gets a unique id, mirroring the platform's
/// id assignment.
///
/// # Example
///
/// ```
/// use docket_gateway::{ChatGateway, LoopbackGateway, Outbound};
/// use docket_types::{ActorId, ChannelId};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (gateway, mut outbound) = LoopbackGateway::with_defaults();
///
/// let handle = gateway
///     .send_prompt(ChannelId::new(1), "Who is the report about?")
///     .await
///     .unwrap();
///
/// match outbound.recv().await.unwrap() {
///     Outbound::Prompt { handle: h, text } => {
///         assert_eq!(h, handle);
///         assert_eq!(text, "Who is the report about?");
///     }
///     other => panic!("unexpected outbound: {other:?}"),
/// }
/// # }
/// ```
pub struct LoopbackGateway {
    texts_tx: broadcast::Sender<TextEvent>,
    reactions_tx: broadcast::Sender<ReactionEvent>,
    outbound_tx: mpsc::Sender<Outbound>,
    next_message: AtomicU64,
}

impl LoopbackGateway {
    /// Creates a loopback gateway and the handle for reading its
    /// outbound traffic.
    #[must_use]
    pub fn new(buffer: usize) -> (Self, OutboundHandle) {
        let (texts_tx, _) = broadcast::channel(buffer);
        let (reactions_tx, _) = broadcast::channel(buffer);
        let (outbound_tx, outbound_rx) = mpsc::channel(buffer);

        let gateway = Self {
            texts_tx,
            reactions_tx,
            outbound_tx,
            next_message: AtomicU64::new(1),
        };

        (gateway, OutboundHandle { rx: outbound_rx })
    }

    /// Creates a loopback gateway with the default buffer size.
    #[must_use]
    pub fn with_defaults() -> (Self, OutboundHandle) {
        Self::new(DEFAULT_BUFFER_SIZE)
    }

    /// Injects an inbound text message and returns its assigned id.
    ///
    /// Events injected while no session is subscribed are dropped;
    /// that is ordinary chatter, not an error.
    pub fn inject_text(
        &self,
        actor: ActorId,
        channel: ChannelId,
        content: impl Into<String>,
    ) -> MessageId {
        let message = self.allocate_message();
        self.publish_text(TextEvent::new(actor, channel, message, content));
        message
    }

    /// Injects an inbound text message carrying attachment URLs.
    pub fn inject_text_with_attachments(
        &self,
        actor: ActorId,
        channel: ChannelId,
        content: impl Into<String>,
        attachments: Vec<String>,
    ) -> MessageId {
        let message = self.allocate_message();
        self.publish_text(
            TextEvent::new(actor, channel, message, content).with_attachments(attachments),
        );
        message
    }

    /// Injects an inbound reaction.
    pub fn inject_reaction(&self, actor: ActorId, message: MessageId, glyph: impl Into<String>) {
        self.publish_reaction(ReactionEvent::new(actor, message, glyph));
    }

    /// Publishes a pre-built text event.
    pub fn publish_text(&self, event: TextEvent) {
        if self.texts_tx.send(event).is_err() {
            tracing::debug!("text event dropped: no session waiting");
        }
    }

    /// Publishes a pre-built reaction event.
    pub fn publish_reaction(&self, event: ReactionEvent) {
        if self.reactions_tx.send(event).is_err() {
            tracing::debug!("reaction event dropped: no session waiting");
        }
    }

    fn allocate_message(&self) -> MessageId {
        MessageId::new(self.next_message.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl ChatGateway for LoopbackGateway {
    async fn send_prompt(
        &self,
        channel: ChannelId,
        text: &str,
    ) -> Result<PromptHandle, GatewayError> {
        let handle = PromptHandle {
            channel,
            message: self.allocate_message(),
        };
        self.outbound_tx
            .send(Outbound::Prompt {
                handle,
                text: text.to_string(),
            })
            .await
            .map_err(|_| GatewayError::Closed)?;
        Ok(handle)
    }

    async fn attach_glyph(
        &self,
        prompt: &PromptHandle,
        glyph: ControlGlyph,
    ) -> Result<(), GatewayError> {
        self.outbound_tx
            .send(Outbound::Glyph {
                message: prompt.message,
                glyph,
            })
            .await
            .map_err(|_| GatewayError::Closed)
    }

    fn texts(&self) -> broadcast::Receiver<TextEvent> {
        self.texts_tx.subscribe()
    }

    fn reactions(&self) -> broadcast::Receiver<ReactionEvent> {
        self.reactions_tx.subscribe()
    }
}

impl std::fmt::Debug for LoopbackGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackGateway")
            .field("next_message", &self.next_message)
            .finish_non_exhaustive()
    }
}

/// Handle for reading what the engine sent through a
/// [`LoopbackGateway`].
pub struct OutboundHandle {
    rx: mpsc::Receiver<Outbound>,
}

impl OutboundHandle {
    /// Receives the next outbound item (async, waits for traffic).
    ///
    /// Returns `None` if the gateway has been dropped.
    pub async fn recv(&mut self) -> Option<Outbound> {
        self.rx.recv().await
    }

    /// Tries to receive without blocking.
    ///
    /// Returns `None` if nothing is queued.
    #[must_use]
    pub fn try_recv(&mut self) -> Option<Outbound> {
        self.rx.try_recv().ok()
    }

    /// Drains all queued outbound items without blocking.
    pub fn drain(&mut self) -> Vec<Outbound> {
        let mut items = Vec::new();
        while let Some(item) = self.try_recv() {
            items.push(item);
        }
        items
    }

    /// Receives outbound items until the next prompt, skipping
    /// attached glyphs.
    ///
    /// Returns `None` if the gateway has been dropped.
    pub async fn next_prompt(&mut self) -> Option<(PromptHandle, String)> {
        while let Some(item) = self.recv().await {
            if let Outbound::Prompt { handle, text } = item {
                return Some((handle, text));
            }
        }
        None
    }
}

impl std::fmt::Debug for OutboundHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboundHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prompt_roundtrip() {
        let (gateway, mut outbound) = LoopbackGateway::new(8);

        let handle = gateway
            .send_prompt(ChannelId::new(5), "What happened?")
            .await
            .expect("send prompt");

        let item = outbound.recv().await.expect("outbound item");
        assert_eq!(
            item,
            Outbound::Prompt {
                handle,
                text: "What happened?".to_string()
            }
        );
    }

    #[tokio::test]
    async fn glyph_attachment_recorded() {
        let (gateway, mut outbound) = LoopbackGateway::new(8);

        let handle = gateway
            .send_prompt(ChannelId::new(5), "How many blocks?")
            .await
            .expect("send prompt");
        gateway
            .attach_glyph(&handle, ControlGlyph::Confirm)
            .await
            .expect("attach glyph");
        gateway
            .attach_glyph(&handle, ControlGlyph::Cancel)
            .await
            .expect("attach glyph");

        let items = outbound.drain();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[1],
            Outbound::Glyph {
                message: handle.message,
                glyph: ControlGlyph::Confirm
            }
        );
        assert_eq!(
            items[2],
            Outbound::Glyph {
                message: handle.message,
                glyph: ControlGlyph::Cancel
            }
        );
    }

    #[tokio::test]
    async fn message_ids_are_unique() {
        let (gateway, mut outbound) = LoopbackGateway::new(8);

        let h1 = gateway
            .send_prompt(ChannelId::new(1), "a")
            .await
            .expect("send");
        let h2 = gateway
            .send_prompt(ChannelId::new(1), "b")
            .await
            .expect("send");
        let injected = gateway.inject_text(ActorId::new(1), ChannelId::new(1), "reply");

        assert_ne!(h1.message, h2.message);
        assert_ne!(h1.message, injected);
        assert_ne!(h2.message, injected);

        // Keep the handle alive until after the sends above.
        let _ = outbound.drain();
    }

    #[tokio::test]
    async fn injected_events_reach_subscribers() {
        let (gateway, _outbound) = LoopbackGateway::new(8);
        let mut texts = gateway.texts();
        let mut reactions = gateway.reactions();

        let actor = ActorId::new(7);
        let channel = ChannelId::new(1);
        let msg = gateway.inject_text(actor, channel, "hello");
        gateway.inject_reaction(actor, msg, "✅");

        let text = texts.recv().await.expect("text event");
        assert_eq!(text.actor, actor);
        assert_eq!(text.message, msg);
        assert_eq!(text.content, "hello");

        let reaction = reactions.recv().await.expect("reaction event");
        assert_eq!(reaction.control(), Some(ControlGlyph::Confirm));
    }

    #[tokio::test]
    async fn events_without_subscribers_are_dropped() {
        let (gateway, _outbound) = LoopbackGateway::new(8);

        // No subscriber yet: must not panic or block.
        gateway.inject_text(ActorId::new(1), ChannelId::new(1), "nobody listening");

        // A later subscriber does not see the old event.
        let mut texts = gateway.texts();
        gateway.inject_text(ActorId::new(1), ChannelId::new(1), "fresh");
        let ev = texts.recv().await.expect("fresh event");
        assert_eq!(ev.content, "fresh");
    }

    #[tokio::test]
    async fn send_after_handle_drop_fails() {
        let (gateway, outbound) = LoopbackGateway::new(8);
        drop(outbound);

        let err = gateway
            .send_prompt(ChannelId::new(1), "anyone there?")
            .await
            .expect_err("send should fail");
        assert!(matches!(err, GatewayError::Closed));
    }

    #[tokio::test]
    async fn next_prompt_skips_glyphs() {
        let (gateway, mut outbound) = LoopbackGateway::new(8);

        let handle = gateway
            .send_prompt(ChannelId::new(2), "first")
            .await
            .expect("send");
        gateway
            .attach_glyph(&handle, ControlGlyph::Cancel)
            .await
            .expect("attach");
        let second = gateway
            .send_prompt(ChannelId::new(2), "second")
            .await
            .expect("send");

        let (h, text) = outbound.next_prompt().await.expect("first prompt");
        assert_eq!((h, text.as_str()), (handle, "first"));

        let (h, text) = outbound.next_prompt().await.expect("second prompt");
        assert_eq!((h, text.as_str()), (second, "second"));
    }
}
