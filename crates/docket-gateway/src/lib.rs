//! Chat gateway abstraction for docket.
//!
//! The dialogue engine never talks to a chat platform directly; it
//! talks to a [`ChatGateway`]. This crate defines that trait, the
//! inbound event types it delivers, the reserved control glyphs, and
//! a [`LoopbackGateway`] implementation used by the console frontend
//! and by tests.
//!
//! Inbound events are broadcast: every active session subscribes to
//! the same two streams (texts, reactions) and filters by its own
//! actor/prompt predicates, so concurrent sessions of different
//! operators coexist without stealing each other's events.

mod error;
mod event;
mod gateway;
mod loopback;

pub use error::GatewayError;
pub use event::{ControlGlyph, ReactionEvent, TextEvent};
pub use gateway::{ChatGateway, PromptHandle};
pub use loopback::{LoopbackGateway, Outbound, OutboundHandle, DEFAULT_BUFFER_SIZE};
