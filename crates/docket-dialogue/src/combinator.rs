//! The dual-wait combinator.
//!
//! One prompt can be answered two ways: the operator types a reply,
//! or clicks a reaction glyph on the prompt message. [`await_reply`]
//! races one wait on each stream under the predicates carried by a
//! [`WaitTicket`] and returns whichever matches first, classified as
//! a [`Reply`] or an unwinding cancellation.
//!
//! ```text
//!                    ┌────────────────────┐
//!   texts ─────────► │                    │    Text(content, ..)
//!                    │  select! loop      │ ─► ControlSignal(Confirm)
//!   reactions ─────► │  (predicate skip)  │    Err(Cancelled)
//!                    └────────────────────┘
//! ```
//!
//! # Loser Retraction
//!
//! Returning drops both pending `recv` futures; a dropped broadcast
//! `recv` consumes nothing. Events that arrive for a finished wait
//! stay queued on the session's receivers and are discarded by the
//! next wait's predicates, so a stale reaction can never satisfy a
//! later, unrelated step.

use crate::error::DialogueError;
use crate::reply::{ControlSignal, Reply};
use docket_gateway::{ControlGlyph, GatewayError, ReactionEvent, TextEvent};
use docket_types::{ActorId, ChannelId, MessageId};
use tokio::sync::broadcast::{self, error::RecvError};

/// Text reply that aborts the session, compared case-insensitively
/// after trimming.
pub const CANCEL_KEYWORD: &str = "stop";

/// Predicates for one dual-wait: who may answer, and on which prompt.
///
/// Both predicates reference only the invoking actor and the
/// anchoring prompt message, so concurrently active sessions of
/// different actors never cross-talk.
#[derive(Debug, Clone, Copy)]
pub struct WaitTicket {
    /// The only actor whose events can resolve this wait.
    pub actor: ActorId,
    /// The channel text replies must arrive in.
    pub channel: ChannelId,
    /// The prompt message reactions must target.
    pub prompt: MessageId,
    /// Whether the confirm glyph resolves this wait.
    pub skippable: bool,
}

impl WaitTicket {
    /// Creates a ticket for one prompt.
    #[must_use]
    pub fn new(actor: ActorId, channel: ChannelId, prompt: MessageId, skippable: bool) -> Self {
        Self {
            actor,
            channel,
            prompt,
            skippable,
        }
    }

    /// Returns `true` if a text event is an answer to this wait.
    #[must_use]
    pub fn matches_text(&self, event: &TextEvent) -> bool {
        event.actor == self.actor && event.channel == self.channel
    }

    /// Returns `true` if a reaction event targets this wait's prompt.
    #[must_use]
    pub fn matches_reaction(&self, event: &ReactionEvent) -> bool {
        event.actor == self.actor && event.message == self.prompt
    }
}

/// Returns `true` if the text is the reserved cancel keyword.
fn is_cancel_keyword(content: &str) -> bool {
    content.trim().eq_ignore_ascii_case(CANCEL_KEYWORD)
}

/// Races the next matching text reply against the next matching
/// reaction and classifies the winner.
///
/// Non-matching events of either kind are skipped without resolving
/// the race. A matching reaction that is not a recognized control
/// glyph is also skipped: a meaningless reaction is never returned
/// as a value. The confirm glyph only resolves skippable waits;
/// otherwise it too is skipped.
///
/// # Errors
///
/// - [`DialogueError::Cancelled`] when the reply is the cancel
///   keyword or the cancel glyph. Callers must let this propagate;
///   it aborts the whole session, not just the current field.
/// - [`DialogueError::Gateway`] when either stream closes.
pub async fn await_reply(
    texts: &mut broadcast::Receiver<TextEvent>,
    reactions: &mut broadcast::Receiver<ReactionEvent>,
    ticket: &WaitTicket,
) -> Result<Reply, DialogueError> {
    loop {
        tokio::select! {
            event = texts.recv() => match event {
                Ok(text) => {
                    if !ticket.matches_text(&text) {
                        continue;
                    }
                    if is_cancel_keyword(&text.content) {
                        return Err(DialogueError::Cancelled);
                    }
                    return Ok(Reply::Text {
                        content: text.content,
                        attachments: text.attachments,
                    });
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "text stream lagged, events lost");
                }
                Err(RecvError::Closed) => {
                    return Err(GatewayError::Closed.into());
                }
            },
            event = reactions.recv() => match event {
                Ok(reaction) => {
                    if !ticket.matches_reaction(&reaction) {
                        continue;
                    }
                    match reaction.control() {
                        Some(ControlGlyph::Cancel) => {
                            return Err(DialogueError::Cancelled);
                        }
                        Some(ControlGlyph::Confirm) if ticket.skippable => {
                            return Ok(Reply::ControlSignal(ControlSignal::Confirm));
                        }
                        Some(ControlGlyph::Confirm) | None => {
                            tracing::debug!(glyph = %reaction.glyph, "reaction ignored");
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "reaction stream lagged, events lost");
                }
                Err(RecvError::Closed) => {
                    return Err(GatewayError::Closed.into());
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTOR: ActorId = ActorId(1);
    const OTHER: ActorId = ActorId(2);
    const CHANNEL: ChannelId = ChannelId(9);
    const PROMPT: MessageId = MessageId(100);

    fn streams() -> (
        broadcast::Sender<TextEvent>,
        broadcast::Sender<ReactionEvent>,
        broadcast::Receiver<TextEvent>,
        broadcast::Receiver<ReactionEvent>,
    ) {
        let (text_tx, text_rx) = broadcast::channel(16);
        let (reaction_tx, reaction_rx) = broadcast::channel(16);
        (text_tx, reaction_tx, text_rx, reaction_rx)
    }

    fn ticket(skippable: bool) -> WaitTicket {
        WaitTicket::new(ACTOR, CHANNEL, PROMPT, skippable)
    }

    fn text(actor: ActorId, content: &str) -> TextEvent {
        TextEvent::new(actor, CHANNEL, MessageId(500), content)
    }

    fn reaction(actor: ActorId, message: MessageId, glyph: &str) -> ReactionEvent {
        ReactionEvent::new(actor, message, glyph)
    }

    // ── Classification ──────────────────────────────────────────────

    #[tokio::test]
    async fn text_reply_wins() {
        let (text_tx, _reaction_tx, mut texts, mut reactions) = streams();
        text_tx.send(text(ACTOR, "grief")).expect("send");

        let reply = await_reply(&mut texts, &mut reactions, &ticket(false))
            .await
            .expect("reply");
        assert_eq!(reply.as_text(), Some("grief"));
    }

    #[tokio::test]
    async fn text_reply_keeps_attachments() {
        let (text_tx, _reaction_tx, mut texts, mut reactions) = streams();
        let event = text(ACTOR, "see attached")
            .with_attachments(vec!["https://img.example/a.png".into()]);
        text_tx.send(event).expect("send");

        let reply = await_reply(&mut texts, &mut reactions, &ticket(false))
            .await
            .expect("reply");
        assert_eq!(reply.attachments(), ["https://img.example/a.png"]);
    }

    #[tokio::test]
    async fn cancel_keyword_unwinds() {
        let (text_tx, _reaction_tx, mut texts, mut reactions) = streams();
        text_tx.send(text(ACTOR, "  STOP  ")).expect("send");

        let err = await_reply(&mut texts, &mut reactions, &ticket(false))
            .await
            .expect_err("cancelled");
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_keyword_must_be_whole_message() {
        let (text_tx, _reaction_tx, mut texts, mut reactions) = streams();
        text_tx.send(text(ACTOR, "stop it right now")).expect("send");

        let reply = await_reply(&mut texts, &mut reactions, &ticket(false))
            .await
            .expect("reply");
        assert_eq!(reply.as_text(), Some("stop it right now"));
    }

    #[tokio::test]
    async fn cancel_glyph_unwinds() {
        let (_text_tx, reaction_tx, mut texts, mut reactions) = streams();
        reaction_tx
            .send(reaction(ACTOR, PROMPT, "❌"))
            .expect("send");

        let err = await_reply(&mut texts, &mut reactions, &ticket(true))
            .await
            .expect_err("cancelled");
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn confirm_glyph_resolves_skippable_wait() {
        let (_text_tx, reaction_tx, mut texts, mut reactions) = streams();
        reaction_tx
            .send(reaction(ACTOR, PROMPT, "✅"))
            .expect("send");

        let reply = await_reply(&mut texts, &mut reactions, &ticket(true))
            .await
            .expect("reply");
        assert!(reply.is_confirm());
    }

    #[tokio::test]
    async fn confirm_glyph_ignored_when_not_skippable() {
        let (text_tx, reaction_tx, mut texts, mut reactions) = streams();
        reaction_tx
            .send(reaction(ACTOR, PROMPT, "✅"))
            .expect("send");
        text_tx.send(text(ACTOR, "actual answer")).expect("send");

        let reply = await_reply(&mut texts, &mut reactions, &ticket(false))
            .await
            .expect("reply");
        assert_eq!(reply.as_text(), Some("actual answer"));
    }

    // ── Predicate filtering ─────────────────────────────────────────

    #[tokio::test]
    async fn foreign_actor_text_skipped() {
        let (text_tx, _reaction_tx, mut texts, mut reactions) = streams();
        text_tx.send(text(OTHER, "not me")).expect("send");
        text_tx.send(text(ACTOR, "me")).expect("send");

        let reply = await_reply(&mut texts, &mut reactions, &ticket(false))
            .await
            .expect("reply");
        assert_eq!(reply.as_text(), Some("me"));
    }

    #[tokio::test]
    async fn foreign_channel_text_skipped() {
        let (text_tx, _reaction_tx, mut texts, mut reactions) = streams();
        text_tx
            .send(TextEvent::new(ACTOR, ChannelId(77), MessageId(500), "elsewhere"))
            .expect("send");
        text_tx.send(text(ACTOR, "here")).expect("send");

        let reply = await_reply(&mut texts, &mut reactions, &ticket(false))
            .await
            .expect("reply");
        assert_eq!(reply.as_text(), Some("here"));
    }

    #[tokio::test]
    async fn reaction_on_other_message_skipped() {
        let (text_tx, reaction_tx, mut texts, mut reactions) = streams();
        // Stale cancel aimed at an older prompt must not abort this wait.
        reaction_tx
            .send(reaction(ACTOR, MessageId(42), "❌"))
            .expect("send");
        text_tx.send(text(ACTOR, "answer")).expect("send");

        let reply = await_reply(&mut texts, &mut reactions, &ticket(true))
            .await
            .expect("reply");
        assert_eq!(reply.as_text(), Some("answer"));
    }

    #[tokio::test]
    async fn foreign_actor_cancel_glyph_skipped() {
        let (text_tx, reaction_tx, mut texts, mut reactions) = streams();
        reaction_tx
            .send(reaction(OTHER, PROMPT, "❌"))
            .expect("send");
        text_tx.send(text(ACTOR, "still going")).expect("send");

        let reply = await_reply(&mut texts, &mut reactions, &ticket(true))
            .await
            .expect("reply");
        assert_eq!(reply.as_text(), Some("still going"));
    }

    #[tokio::test]
    async fn unrecognized_glyph_never_returned() {
        let (text_tx, reaction_tx, mut texts, mut reactions) = streams();
        reaction_tx
            .send(reaction(ACTOR, PROMPT, "🎉"))
            .expect("send");
        text_tx.send(text(ACTOR, "words")).expect("send");

        let reply = await_reply(&mut texts, &mut reactions, &ticket(true))
            .await
            .expect("reply");
        assert_eq!(reply.as_text(), Some("words"));
    }

    // ── Stream failure ──────────────────────────────────────────────

    #[tokio::test]
    async fn closed_text_stream_is_gateway_error() {
        let (text_tx, _reaction_tx, mut texts, mut reactions) = streams();
        drop(text_tx);

        let err = await_reply(&mut texts, &mut reactions, &ticket(false))
            .await
            .expect_err("closed");
        assert!(matches!(err, DialogueError::Gateway(GatewayError::Closed)));
    }

    #[tokio::test]
    async fn closed_reaction_stream_is_gateway_error() {
        let (_text_tx, reaction_tx, mut texts, mut reactions) = streams();
        drop(reaction_tx);

        let err = await_reply(&mut texts, &mut reactions, &ticket(false))
            .await
            .expect_err("closed");
        assert!(matches!(err, DialogueError::Gateway(GatewayError::Closed)));
    }

    // ── Keyword normalization ───────────────────────────────────────

    #[test]
    fn cancel_keyword_normalization() {
        assert!(is_cancel_keyword("stop"));
        assert!(is_cancel_keyword("Stop"));
        assert!(is_cancel_keyword("STOP"));
        assert!(is_cancel_keyword("  stop\n"));
        assert!(!is_cancel_keyword("stop!"));
        assert!(!is_cancel_keyword("halt"));
        assert!(!is_cancel_keyword(""));
    }
}
