//! Report records.
//!
//! A [`NewReport`] is the fully collected draft a session hands to the
//! store; a [`ReportRecord`] is what the store hands back, with the
//! assigned id and creation timestamp. [`ReportField`] carries a
//! single-field edit.

use crate::vocab::{OffenseKind, Punishment};
use chrono::{DateTime, NaiveDate, Utc};
use docket_types::{ActorId, ReportId};
use serde::{Deserialize, Serialize};

/// A completed report draft, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReport {
    /// Username of the rule-breaker.
    pub subject: String,
    /// What kind of offense happened.
    pub kind: OffenseKind,
    /// The staff member who filed the report.
    pub staff: ActorId,
    /// Free-text description of the incident.
    pub summary: String,
    /// How many blocks were affected (0 when not applicable).
    pub blocks: u32,
    /// Evidence links collected during intake.
    pub evidence: Vec<String>,
    /// The day the offense happened.
    pub happened_at: NaiveDate,
    /// Punishment applied, `Punishment::None` if none yet.
    pub punishment: Punishment,
}

/// A committed report as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Store-assigned id.
    pub id: ReportId,
    /// When the report was filed.
    pub created_at: DateTime<Utc>,
    /// Username of the rule-breaker.
    pub subject: String,
    /// What kind of offense happened.
    pub kind: OffenseKind,
    /// The staff member who filed the report.
    pub staff: ActorId,
    /// Free-text description of the incident.
    pub summary: String,
    /// How many blocks were affected.
    pub blocks: u32,
    /// Evidence links.
    pub evidence: Vec<String>,
    /// The day the offense happened.
    pub happened_at: NaiveDate,
    /// Punishment applied.
    pub punishment: Punishment,
}

impl ReportRecord {
    /// Builds the record the store creates on insert.
    #[must_use]
    pub fn from_new(id: ReportId, created_at: DateTime<Utc>, new: NewReport) -> Self {
        Self {
            id,
            created_at,
            subject: new.subject,
            kind: new.kind,
            staff: new.staff,
            summary: new.summary,
            blocks: new.blocks,
            evidence: new.evidence,
            happened_at: new.happened_at,
            punishment: new.punishment,
        }
    }

    /// Renders the record as a plain-text block for the operator.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!(
            "Report #{id}: {subject}'s {kind}\n\
             Reported on: {created}\n\
             Happened at: {happened}\n\
             Reporter: {staff}\n\
             Blocks affected: {blocks}\n\
             Punishment: {punishment}\n\
             Summary: {summary}",
            id = self.id.value(),
            subject = self.subject,
            kind = self.kind,
            created = self.created_at.format("%d %b %Y %H:%M"),
            happened = self.happened_at.format("%d %b %Y"),
            staff = self.staff,
            blocks = self.blocks,
            punishment = self.punishment,
            summary = self.summary,
        );
        if !self.evidence.is_empty() {
            out.push_str("\nEvidence:");
            for link in &self.evidence {
                out.push('\n');
                out.push_str(link);
            }
        }
        out
    }
}

/// One editable field with its new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportField {
    /// New subject username.
    Subject(String),
    /// New offense kind.
    Kind(OffenseKind),
    /// New summary text.
    Summary(String),
    /// New blocks-affected count.
    Blocks(u32),
    /// Replacement evidence link list.
    Evidence(Vec<String>),
    /// New offense date.
    HappenedAt(NaiveDate),
    /// New punishment.
    Punishment(Punishment),
}

impl ReportField {
    /// The field's name as operators spell it in edit commands.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Subject(_) => "username",
            Self::Kind(_) => "type",
            Self::Summary(_) => "summary",
            Self::Blocks(_) => "blocks",
            Self::Evidence(_) => "image links",
            Self::HappenedAt(_) => "happened at",
            Self::Punishment(_) => "punishment",
        }
    }

    /// Applies the edit to a record.
    pub fn apply(self, record: &mut ReportRecord) {
        match self {
            Self::Subject(subject) => record.subject = subject,
            Self::Kind(kind) => record.kind = kind,
            Self::Summary(summary) => record.summary = summary,
            Self::Blocks(blocks) => record.blocks = blocks,
            Self::Evidence(evidence) => record.evidence = evidence,
            Self::HappenedAt(date) => record.happened_at = date,
            Self::Punishment(punishment) => record.punishment = punishment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> ReportRecord {
        ReportRecord::from_new(
            ReportId::new(3),
            Utc.with_ymd_and_hms(2026, 8, 1, 12, 30, 0).single().expect("valid timestamp"),
            NewReport {
                subject: "alice".into(),
                kind: OffenseKind::Grief,
                staff: ActorId::new(42),
                summary: "flattened spawn".into(),
                blocks: 120,
                evidence: vec!["https://img.example/a.png".into()],
                happened_at: NaiveDate::from_ymd_opt(2026, 7, 30).expect("valid date"),
                punishment: Punishment::TempBan,
            },
        )
    }

    #[test]
    fn from_new_carries_all_fields() {
        let record = sample_record();
        assert_eq!(record.id, ReportId::new(3));
        assert_eq!(record.subject, "alice");
        assert_eq!(record.kind, OffenseKind::Grief);
        assert_eq!(record.blocks, 120);
        assert_eq!(record.punishment, Punishment::TempBan);
    }

    #[test]
    fn render_includes_the_essentials() {
        let text = sample_record().render();
        assert!(text.contains("Report #3"));
        assert!(text.contains("alice's grief"));
        assert!(text.contains("Blocks affected: 120"));
        assert!(text.contains("Punishment: tban"));
        assert!(text.contains("https://img.example/a.png"));
    }

    #[test]
    fn render_omits_empty_evidence_section() {
        let mut record = sample_record();
        record.evidence.clear();
        assert!(!record.render().contains("Evidence:"));
    }

    #[test]
    fn field_apply_updates_only_its_field() {
        let mut record = sample_record();
        ReportField::Blocks(7).apply(&mut record);
        assert_eq!(record.blocks, 7);
        assert_eq!(record.subject, "alice");

        ReportField::Punishment(Punishment::PermBan).apply(&mut record);
        assert_eq!(record.punishment, Punishment::PermBan);
    }

    #[test]
    fn field_names_match_edit_vocabulary() {
        assert_eq!(ReportField::Subject(String::new()).name(), "username");
        assert_eq!(ReportField::Evidence(Vec::new()).name(), "image links");
        assert_eq!(
            ReportField::HappenedAt(NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"))
                .name(),
            "happened at"
        );
    }
}
