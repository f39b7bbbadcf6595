//! Field-collection sessions and the prompt-retry loop.
//!
//! A [`FieldSession`] is one command invocation's conversation: it
//! owns subscriptions to both inbound event streams, the guard
//! permit, and the actor/channel identity every wait filters on.
//! [`collect`](FieldSession::collect) runs the prompt-retry loop for
//! one [`FieldSpec`]; callers sequence several collects to build
//! their record, and any cancellation unwinds through `?` past all
//! of them, dropping the permit on the way out.
//!
//! Both streams are subscribed at construction, before the first
//! prompt is sent, so a fast reply can never slip between prompt and
//! wait.

use crate::combinator::{await_reply, WaitTicket};
use crate::error::DialogueError;
use crate::field::FieldSpec;
use crate::guard::SessionPermit;
use docket_gateway::{ChatGateway, ControlGlyph, ReactionEvent, TextEvent};
use docket_types::{ActorId, ChannelId, SessionId};
use std::sync::Arc;
use tokio::sync::broadcast;

/// One command invocation's field-collection conversation.
///
/// Exists for the duration of a single invocation and is owned
/// exclusively by it. Dropping the session releases the guard
/// permit, whatever path got us there.
pub struct FieldSession<G: ChatGateway + ?Sized> {
    gateway: Arc<G>,
    actor: ActorId,
    channel: ChannelId,
    id: SessionId,
    // Held for its Drop; never read.
    _permit: Option<SessionPermit>,
    texts: broadcast::Receiver<TextEvent>,
    reactions: broadcast::Receiver<ReactionEvent>,
}

impl<G: ChatGateway + ?Sized> FieldSession<G> {
    /// Opens a session for one actor in one channel.
    ///
    /// `permit` is the guard token for this actor, or `None` when
    /// the actor is exempt from serialization.
    #[must_use]
    pub fn begin(
        gateway: Arc<G>,
        actor: ActorId,
        channel: ChannelId,
        permit: Option<SessionPermit>,
    ) -> Self {
        let texts = gateway.texts();
        let reactions = gateway.reactions();
        let id = SessionId::new();
        tracing::debug!(session = %id, %actor, %channel, "collection session opened");

        Self {
            gateway,
            actor,
            channel,
            id,
            _permit: permit,
            texts,
            reactions,
        }
    }

    /// This session's correlation id.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The actor this session belongs to.
    #[must_use]
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// The channel this session converses in.
    #[must_use]
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Runs the prompt-retry loop for one field.
    ///
    /// Prompts, waits for the dual-wait to resolve, and parses the
    /// reply. A rejected reply re-prompts with the field's retry
    /// text; there is no retry bound. Each iteration issues a fresh
    /// prompt and a fresh race; the previous race is fully dropped
    /// first.
    ///
    /// Returns `Ok(None)` only when a skippable field was skipped
    /// via the confirm glyph; the field's `parse` is not invoked for
    /// a skip.
    ///
    /// # Errors
    ///
    /// [`DialogueError::Cancelled`] propagates from the wait and
    /// must keep propagating: it aborts the whole session.
    /// [`DialogueError::Gateway`] if the platform connection fails.
    pub async fn collect<T>(&mut self, spec: &FieldSpec<T>) -> Result<Option<T>, DialogueError> {
        let mut attempt: u32 = 0;
        loop {
            let text = if attempt == 0 { spec.prompt() } else { spec.retry() };
            let prompt = self.gateway.send_prompt(self.channel, text).await?;
            if spec.is_skippable() {
                self.gateway
                    .attach_glyph(&prompt, ControlGlyph::Confirm)
                    .await?;
            }
            self.gateway
                .attach_glyph(&prompt, ControlGlyph::Cancel)
                .await?;

            let ticket =
                WaitTicket::new(self.actor, self.channel, prompt.message, spec.is_skippable());
            let reply = await_reply(&mut self.texts, &mut self.reactions, &ticket).await?;

            if reply.is_confirm() {
                tracing::debug!(session = %self.id, field = spec.name(), "field skipped");
                return Ok(None);
            }
            match spec.parse(&reply) {
                Some(value) => {
                    tracing::debug!(
                        session = %self.id,
                        field = spec.name(),
                        attempt,
                        "field accepted"
                    );
                    return Ok(Some(value));
                }
                None => {
                    tracing::debug!(
                        session = %self.id,
                        field = spec.name(),
                        attempt,
                        "reply rejected, re-prompting"
                    );
                    attempt += 1;
                }
            }
        }
    }

    /// Collects a field that must produce a value.
    ///
    /// Identical to [`collect`](Self::collect), except a skip just
    /// asks again. For a non-skippable spec the skip path is
    /// unreachable and this returns on the first accepted value.
    ///
    /// # Errors
    ///
    /// Same as [`collect`](Self::collect).
    pub async fn collect_required<T>(&mut self, spec: &FieldSpec<T>) -> Result<T, DialogueError> {
        loop {
            if let Some(value) = self.collect(spec).await? {
                return Ok(value);
            }
        }
    }

}

impl<G: ChatGateway + ?Sized> std::fmt::Debug for FieldSession<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSession")
            .field("id", &self.id)
            .field("actor", &self.actor)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}
