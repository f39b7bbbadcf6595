//! Core types for docket.
//!
//! This crate provides foundational identifier types and the shared
//! error-code convention for the docket report-intake engine.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Foundation Layer                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  docket-types    : ID types, ErrorCode            ◄── HERE  │
//! │  docket-gateway  : chat events, ChatGateway trait           │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Engine Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  docket-dialogue : dual-wait, field collection, guard       │
//! │  docket-report   : report domain, commands, dispatch        │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Frontend Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  docket-cli      : console frontend                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! Actor, channel and message ids are plain 64-bit integers: the chat
//! platform assigns them (snowflake-style) and docket only routes and
//! compares them. Report ids are a store-assigned sequence. Session
//! ids are random UUIDs minted per command invocation, used purely
//! for log correlation.
//!
//! # Example
//!
//! ```
//! use docket_types::{ActorId, ChannelId, MessageId, ReportId, SessionId};
//!
//! let actor = ActorId::new(4217);
//! let channel = ChannelId::new(99);
//! let prompt = MessageId::new(100_000);
//! let report = ReportId::new(1);
//!
//! // Session ids are random per invocation
//! let session = SessionId::new();
//! assert_ne!(session, SessionId::new());
//!
//! assert_eq!(format!("{actor} in {channel}"), "actor:4217 in chan:99");
//! assert_eq!(prompt.value(), 100_000);
//! assert_eq!(report.to_string(), "report:1");
//! ```

mod error;
mod id;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{ActorId, ChannelId, MessageId, ReportId, SessionId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_id_roundtrip() {
        let id = ActorId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id, ActorId(42));
        assert_ne!(id, ActorId::new(43));
    }

    #[test]
    fn actor_id_display() {
        let id = ActorId::new(7);
        assert_eq!(format!("{id}"), "actor:7");
    }

    #[test]
    fn actor_id_usable_as_map_key() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        assert!(set.insert(ActorId::new(1)));
        assert!(!set.insert(ActorId::new(1)));
        assert!(set.insert(ActorId::new(2)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn channel_id_display() {
        let id = ChannelId::new(555);
        assert_eq!(format!("{id}"), "chan:555");
        assert_eq!(id.value(), 555);
    }

    #[test]
    fn message_id_display() {
        let id = MessageId::new(123_456);
        assert_eq!(format!("{id}"), "msg:123456");
    }

    #[test]
    fn message_id_equality() {
        assert_eq!(MessageId::new(9), MessageId::new(9));
        assert_ne!(MessageId::new(9), MessageId::new(10));
    }

    #[test]
    fn report_id_ordering() {
        // Store assigns ids as a monotonic sequence; ordering follows.
        assert!(ReportId::new(1) < ReportId::new(2));
        assert_eq!(ReportId::new(3).to_string(), "report:3");
    }

    #[test]
    fn session_id_uniqueness() {
        let id1 = SessionId::new();
        let id2 = SessionId::new();
        assert_ne!(id1, id2);
    }

    // NOTE: SessionId does not implement Default intentionally.
    // See id.rs for rationale.

    #[test]
    fn session_id_display() {
        let id = SessionId::new();
        let display = format!("{id}");
        assert!(display.starts_with("session:"));
        assert!(display.contains(&id.uuid().to_string()));
    }

    #[test]
    fn ids_serialize_transparently() {
        let actor = ActorId::new(12);
        let json = serde_json::to_string(&actor).expect("serialize");
        assert_eq!(json, "12");

        let back: ActorId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, actor);
    }
}
