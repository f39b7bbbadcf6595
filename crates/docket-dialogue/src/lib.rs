//! Conversational field-collection engine for docket.
//!
//! A chat command that needs several validated answers from a human
//! operator runs a session through this crate:
//!
//! ```text
//! command ──► ActorGuard::acquire ──► FieldSession::begin
//!                                          │
//!                              ┌───────────▼───────────┐
//!                              │ collect(FieldSpec)    │  one per field
//!                              │   prompt ─► dual-wait │
//!                              │   parse ─┬─ accept    │
//!                              │          └─ re-prompt │
//!                              └───────────┬───────────┘
//!                                          │ Cancelled? unwind all
//!                                          ▼
//!                              caller commits the record
//! ```
//!
//! The hard part is the dual-wait: each prompt can be answered by a
//! text reply or by a reaction glyph on the prompt message, whichever
//! comes first. [`combinator::await_reply`] races both event streams
//! under per-actor predicates, retracts the loser, and classifies the
//! winner as a [`Reply`] or an unwinding cancellation.
//!
//! # Cancellation
//!
//! The cancel keyword (`stop`) or the ❌ glyph produce
//! [`DialogueError::Cancelled`], an error value carried by `?`
//! through every nested loop. No partial record survives it and the
//! actor's [`SessionPermit`] drops on the way out.
//!
//! # Concurrency
//!
//! Sessions of different actors interleave freely on the runtime;
//! the only shared mutable state is the [`ActorGuard`] busy set,
//! locked only for check-and-mark, never across an await.

pub mod combinator;
mod error;
mod field;
mod guard;
mod reply;
mod session;

pub use combinator::{await_reply, WaitTicket, CANCEL_KEYWORD};
pub use error::DialogueError;
pub use field::FieldSpec;
pub use guard::{ActorGuard, SessionPermit};
pub use reply::{ControlSignal, Reply};
pub use session::FieldSession;
