//! Per-subject offense aggregates.
//!
//! An [`OffenderSummary`] condenses every report filed against one
//! subject. The tunnel count really counts tunnel reports, not grief
//! reports, and averages only divide by non-zero counts.

use crate::record::ReportRecord;
use crate::vocab::{OffenseKind, Punishment};
use chrono::{DateTime, NaiveDate, Utc};

/// Aggregated view of one subject's record history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffenderSummary {
    /// The subject username.
    pub subject: String,
    /// Total reports on file.
    pub total: usize,
    /// Distinct offense descriptors, in first-seen order.
    pub descriptors: Vec<&'static str>,
    /// Blocks broken across grief reports.
    pub blocks_griefed: u32,
    /// Blocks broken across tunnel reports.
    pub blocks_tunneled: u32,
    /// Number of grief reports.
    pub griefs: usize,
    /// Number of tunnel reports.
    pub tunnels: usize,
    /// Punishments actually applied, oldest first.
    pub punishments: Vec<Punishment>,
    /// Creation time of the most recent report.
    pub latest_report: Option<DateTime<Utc>>,
    /// Most recent offense date on file.
    pub latest_offense: Option<NaiveDate>,
}

impl OffenderSummary {
    /// Computes the summary over a subject's reports.
    ///
    /// Returns `None` when there are no reports; callers treat that
    /// as "subject not in database" rather than rendering an empty
    /// summary.
    #[must_use]
    pub fn compute(subject: &str, reports: &[ReportRecord]) -> Option<Self> {
        if reports.is_empty() {
            return None;
        }

        let mut descriptors = Vec::new();
        for report in reports {
            let descriptor = report.kind.descriptor();
            if !descriptors.contains(&descriptor) {
                descriptors.push(descriptor);
            }
        }

        let of_kind = |kind: OffenseKind| reports.iter().filter(move |r| r.kind == kind);
        let blocks_griefed = of_kind(OffenseKind::Grief).map(|r| r.blocks).sum();
        let blocks_tunneled = of_kind(OffenseKind::Tunnel).map(|r| r.blocks).sum();
        let griefs = of_kind(OffenseKind::Grief).count();
        let tunnels = of_kind(OffenseKind::Tunnel).count();

        let punishments = reports
            .iter()
            .map(|r| r.punishment)
            .filter(Punishment::is_applied)
            .collect();

        Some(Self {
            subject: subject.to_string(),
            total: reports.len(),
            descriptors,
            blocks_griefed,
            blocks_tunneled,
            griefs,
            tunnels,
            punishments,
            latest_report: reports.iter().map(|r| r.created_at).max(),
            latest_offense: reports.iter().map(|r| r.happened_at).max(),
        })
    }

    /// Renders the summary as a plain-text block for the operator.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!(
            "User info: {} ({})\nReports on file: {}",
            self.subject,
            self.descriptors.join(", "),
            self.total
        );
        if let Some(latest) = self.latest_report {
            out.push_str(&format!(
                "\nLatest report: {}",
                latest.format("%d %b %Y %H:%M")
            ));
        }
        if let Some(latest) = self.latest_offense {
            out.push_str(&format!("\nLatest offense: {}", latest.format("%d %b %Y")));
        }
        if self.griefs > 0 {
            out.push_str(&format!(
                "\nBlocks griefed: {} broken, {} average",
                self.blocks_griefed,
                self.blocks_griefed / self.griefs as u32
            ));
        }
        if self.tunnels > 0 {
            out.push_str(&format!(
                "\nBlocks tunneled: {} broken, {} average",
                self.blocks_tunneled,
                self.blocks_tunneled / self.tunnels as u32
            ));
        }
        if !self.punishments.is_empty() {
            let tokens: Vec<&str> = self.punishments.iter().map(Punishment::token).collect();
            out.push_str(&format!("\nPrevious punishments: {}", tokens.join(", ")));
        }
        out
    }
}
