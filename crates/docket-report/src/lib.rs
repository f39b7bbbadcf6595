//! Report commands for docket.
//!
//! The operator-facing layer: it parses nothing and prints nothing,
//! but owns everything in between a parsed `report ...` command and
//! the text an operator should read back:
//!
//! ```text
//! report new ──► ReportCommands::new_report
//!                    │ ActorGuard, then one FieldSession
//!                    │ intake script: subject, kind, summary,
//!                    │   blocks, evidence, happened_at, punishment
//!                    ▼
//!                ReportStore::insert ──► "Report saved to ID n."
//!
//! any error ──► DispatchRegistry::resolve ──► operator text (or silence)
//! ```
//!
//! [`vocab`] fixes the closed vocabularies (offense kinds and
//! punishments), [`record`] the stored shape, [`intake`] the field
//! specs and their prompt wording, and [`summary`] the per-subject
//! aggregation behind `report info`.
//!
//! # Error handling
//!
//! Every command returns `Result<String, CommandError>`. The caller
//! never matches on the error itself; it hands it to a
//! [`DispatchRegistry`], which walks the [`ErrorKind`] parent chain
//! to the nearest registered handler and yields the operator text,
//! or `None` for errors that end silently.

mod commands;
mod dispatch;
mod error;
pub mod intake;
pub mod parse;
mod record;
mod store;
mod summary;
mod vocab;

pub use commands::ReportCommands;
pub use dispatch::{DispatchRegistry, CANCELLED, INTERNAL_ERROR};
pub use error::{CommandError, ErrorKind, NotFoundKind};
pub use intake::{EditTarget, EvidenceAction};
pub use record::{NewReport, ReportField, ReportRecord};
pub use store::{MemoryStore, ReportStore, StoreError};
pub use summary::OffenderSummary;
pub use vocab::{OffenseKind, Punishment};
