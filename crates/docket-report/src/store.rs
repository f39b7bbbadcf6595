//! Report persistence.
//!
//! [`ReportStore`] is the narrow interface the command layer commits
//! through; persistence engine design is out of scope, so the only
//! shipped implementation is [`MemoryStore`], used by the console
//! frontend and the test suites.

use crate::record::{NewReport, ReportField, ReportRecord};
use async_trait::async_trait;
use chrono::Utc;
use docket_types::{ErrorCode, ReportId};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors produced by a report store.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | `Unavailable` | `STORE_UNAVAILABLE` | Yes |
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("report store unavailable: {reason}")]
    Unavailable {
        /// What the backend said.
        reason: String,
    },
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "STORE_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Outages pass
            Self::Unavailable { .. } => true,
        }
    }
}

/// Persistence boundary for report records.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Inserts a completed report and returns its assigned id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] if the backend cannot be reached.
    async fn insert(&self, report: NewReport) -> Result<ReportId, StoreError>;

    /// Fetches a report by id; `None` if no such report exists.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] if the backend cannot be reached.
    async fn fetch(&self, id: ReportId) -> Result<Option<ReportRecord>, StoreError>;

    /// Fetches all reports filed against a subject, oldest first.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] if the backend cannot be reached.
    async fn fetch_by_subject(&self, subject: &str) -> Result<Vec<ReportRecord>, StoreError>;

    /// Applies a single-field edit; returns `false` if no such report
    /// exists.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] if the backend cannot be reached.
    async fn update(&self, id: ReportId, field: ReportField) -> Result<bool, StoreError>;
}

/// In-memory [`ReportStore`].
///
/// Ids are a monotonic sequence starting at 1. The map is ordered by
/// id so subject queries come back oldest first.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    records: BTreeMap<ReportId, ReportRecord>,
    next_id: u64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    /// Returns `true` if nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn insert(&self, report: NewReport) -> Result<ReportId, StoreError> {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = ReportId::new(inner.next_id);
        inner
            .records
            .insert(id, ReportRecord::from_new(id, Utc::now(), report));
        tracing::debug!(%id, "report inserted");
        Ok(id)
    }

    async fn fetch(&self, id: ReportId) -> Result<Option<ReportRecord>, StoreError> {
        Ok(self.inner.lock().records.get(&id).cloned())
    }

    async fn fetch_by_subject(&self, subject: &str) -> Result<Vec<ReportRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .records
            .values()
            .filter(|record| record.subject == subject)
            .cloned()
            .collect())
    }

    async fn update(&self, id: ReportId, field: ReportField) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock();
        match inner.records.get_mut(&id) {
            Some(record) => {
                tracing::debug!(%id, field = field.name(), "report updated");
                field.apply(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
