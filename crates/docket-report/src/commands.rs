//! Report commands.
//!
//! [`ReportCommands`] is the bridge between a parsed operator command
//! and the engine underneath: it authorizes the actor, takes the
//! per-actor guard, runs the intake script as one [`FieldSession`],
//! and commits through the store. Every failure path surfaces as a
//! [`CommandError`] for the dispatch registry; nothing here decides
//! what the operator sees on error.

use crate::error::{CommandError, NotFoundKind};
use crate::intake::{self, EditTarget};
use crate::record::{NewReport, ReportField};
use crate::store::ReportStore;
use crate::summary::OffenderSummary;
use crate::vocab::Punishment;
use chrono::Utc;
use docket_dialogue::{ActorGuard, FieldSession};
use docket_gateway::ChatGateway;
use docket_types::{ActorId, ChannelId, ReportId};
use std::sync::Arc;

/// The report command surface.
///
/// One instance serves every actor; sessions for different actors
/// interleave freely and the shared [`ActorGuard`] keeps each actor
/// down to one session at a time.
pub struct ReportCommands<G: ChatGateway + ?Sized, S: ReportStore + ?Sized> {
    gateway: Arc<G>,
    store: Arc<S>,
    guard: ActorGuard,
    owner: Option<ActorId>,
    staff: Vec<ActorId>,
}

impl<G: ChatGateway + ?Sized, S: ReportStore + ?Sized> ReportCommands<G, S> {
    /// Creates the command surface.
    ///
    /// `owner` is exempt from the per-actor guard and from the staff
    /// check.
    #[must_use]
    pub fn new(gateway: Arc<G>, store: Arc<S>, owner: Option<ActorId>) -> Self {
        Self {
            gateway,
            store,
            guard: ActorGuard::new(),
            owner,
            staff: Vec::new(),
        }
    }

    /// Restricts report commands to the given staff actors.
    ///
    /// An empty list (the default) allows everyone.
    #[must_use]
    pub fn with_staff(mut self, staff: Vec<ActorId>) -> Self {
        self.staff = staff;
        self
    }

    /// The guard serializing sessions per actor.
    #[must_use]
    pub fn guard(&self) -> &ActorGuard {
        &self.guard
    }

    fn authorize(&self, actor: ActorId) -> Result<(), CommandError> {
        if self.staff.is_empty() || self.staff.contains(&actor) || self.owner == Some(actor) {
            Ok(())
        } else {
            Err(CommandError::PermissionDenied)
        }
    }

    /// Runs the full intake script and commits a new report.
    ///
    /// # Errors
    ///
    /// [`CommandError::AlreadyInSession`] before any prompt is sent if
    /// the actor has a session in flight; [`CommandError::Cancelled`]
    /// whenever the operator aborts, in which case nothing is
    /// inserted.
    pub async fn new_report(
        &self,
        actor: ActorId,
        channel: ChannelId,
    ) -> Result<String, CommandError> {
        self.authorize(actor)?;
        let permit = self.guard.acquire_for(actor, self.owner)?;
        let mut session = FieldSession::begin(Arc::clone(&self.gateway), actor, channel, permit);
        let today = Utc::now().date_naive();

        let subject = session.collect_required(&intake::subject_field()).await?;
        let kind = session.collect_required(&intake::kind_field()).await?;

        // Heads-up for repeat offenders, sent mid-session without
        // awaiting a reply.
        let history = self.store.fetch_by_subject(&subject).await?;
        if let Some(summary) = OffenderSummary::compute(&subject, &history) {
            self.gateway
                .send_prompt(
                    channel,
                    &format!("User is already in the database.\n{}", summary.render()),
                )
                .await
                .map_err(docket_dialogue::DialogueError::from)?;
        }

        let summary = session.collect_required(&intake::summary_field()).await?;
        let blocks = session.collect(&intake::blocks_field()).await?.unwrap_or(0);
        let evidence = intake::collect_evidence(&mut session).await?;
        let happened_at = session
            .collect(&intake::happened_at_field(today))
            .await?
            .unwrap_or(today);
        let punishment = session
            .collect(&intake::punishment_field())
            .await?
            .unwrap_or(Punishment::None);

        let id = self
            .store
            .insert(NewReport {
                subject,
                kind,
                staff: actor,
                summary,
                blocks,
                evidence,
                happened_at,
                punishment,
            })
            .await?;
        tracing::debug!(%id, %actor, "report committed");

        Ok(format!("Report saved to ID {}.", id.value()))
    }

    /// Renders one report by id.
    ///
    /// # Errors
    ///
    /// [`CommandError::NotFound`] if no report has that id.
    pub async fn show(&self, actor: ActorId, id: ReportId) -> Result<String, CommandError> {
        self.authorize(actor)?;
        let record = self
            .store
            .fetch(id)
            .await?
            .ok_or(CommandError::NotFound(NotFoundKind::Report))?;
        Ok(record.render())
    }

    /// Renders the offense summary for a subject.
    ///
    /// # Errors
    ///
    /// [`CommandError::NotFound`] if the subject has no reports.
    pub async fn info(&self, actor: ActorId, subject: &str) -> Result<String, CommandError> {
        self.authorize(actor)?;
        let reports = self.store.fetch_by_subject(subject).await?;
        let summary = OffenderSummary::compute(subject, &reports)
            .ok_or(CommandError::NotFound(NotFoundKind::Subject))?;
        Ok(summary.render())
    }

    /// Edits one field of an existing report via a single-field
    /// session.
    ///
    /// # Errors
    ///
    /// [`CommandError::NotFound`] if no report has that id;
    /// [`CommandError::NoEvidenceLinks`] when asked to remove
    /// evidence from a report that has none; the usual session errors
    /// otherwise.
    pub async fn edit(
        &self,
        actor: ActorId,
        channel: ChannelId,
        id: ReportId,
        target: EditTarget,
    ) -> Result<String, CommandError> {
        self.authorize(actor)?;
        let record = self
            .store
            .fetch(id)
            .await?
            .ok_or(CommandError::NotFound(NotFoundKind::Report))?;

        let permit = self.guard.acquire_for(actor, self.owner)?;
        let mut session = FieldSession::begin(Arc::clone(&self.gateway), actor, channel, permit);
        let today = Utc::now().date_naive();

        let field = match target {
            EditTarget::Username => {
                ReportField::Subject(session.collect_required(&intake::subject_field()).await?)
            }
            EditTarget::Kind => {
                ReportField::Kind(session.collect_required(&intake::kind_field()).await?)
            }
            EditTarget::Summary => {
                ReportField::Summary(session.collect_required(&intake::summary_field()).await?)
            }
            EditTarget::Blocks => ReportField::Blocks(
                session.collect(&intake::blocks_field()).await?.unwrap_or(0),
            ),
            EditTarget::HappenedAt => ReportField::HappenedAt(
                session
                    .collect(&intake::happened_at_field(today))
                    .await?
                    .unwrap_or(today),
            ),
            EditTarget::Punishment => ReportField::Punishment(
                session
                    .collect(&intake::punishment_field())
                    .await?
                    .unwrap_or(Punishment::None),
            ),
            EditTarget::Evidence => {
                match session
                    .collect_required(&intake::evidence_action_field())
                    .await?
                {
                    intake::EvidenceAction::Add => {
                        let mut links = record.evidence.clone();
                        links.extend(intake::collect_evidence(&mut session).await?);
                        ReportField::Evidence(links)
                    }
                    intake::EvidenceAction::Remove => {
                        if record.evidence.is_empty() {
                            return Err(CommandError::NoEvidenceLinks);
                        }
                        ReportField::Evidence(Vec::new())
                    }
                }
            }
        };
        drop(session);

        if !self.store.update(id, field).await? {
            // The report vanished between fetch and update.
            return Err(CommandError::NotFound(NotFoundKind::Report));
        }
        Ok(format!(
            "Report edited! Use `report id {}` to check the result.",
            id.value()
        ))
    }
}

impl<G: ChatGateway + ?Sized, S: ReportStore + ?Sized> std::fmt::Debug for ReportCommands<G, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportCommands")
            .field("owner", &self.owner)
            .field("staff", &self.staff)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::vocab::OffenseKind;
    use chrono::NaiveDate;
    use docket_gateway::LoopbackGateway;

    fn commands(
        owner: Option<ActorId>,
        staff: Vec<ActorId>,
    ) -> ReportCommands<LoopbackGateway, MemoryStore> {
        let (gateway, outbound) = LoopbackGateway::with_defaults();
        // The outbound handle is dropped; these tests never prompt.
        drop(outbound);
        ReportCommands::new(Arc::new(gateway), Arc::new(MemoryStore::new()), owner)
            .with_staff(staff)
    }

    fn sample_report(subject: &str) -> NewReport {
        NewReport {
            subject: subject.into(),
            kind: OffenseKind::Grief,
            staff: ActorId::new(1),
            summary: "flattened spawn".into(),
            blocks: 120,
            evidence: Vec::new(),
            happened_at: NaiveDate::from_ymd_opt(2026, 7, 30).expect("valid date"),
            punishment: Punishment::Warn,
        }
    }

    // ── Authorization ───────────────────────────────────────────────

    #[tokio::test]
    async fn empty_staff_list_allows_everyone() {
        let commands = commands(None, Vec::new());
        // No reports yet: NotFound proves we got past authorization.
        let err = commands
            .show(ActorId::new(5), ReportId::new(1))
            .await
            .expect_err("not found");
        assert!(matches!(
            err,
            CommandError::NotFound(NotFoundKind::Report)
        ));
    }

    #[tokio::test]
    async fn non_staff_actor_is_denied() {
        let commands = commands(None, vec![ActorId::new(1)]);
        let err = commands
            .show(ActorId::new(2), ReportId::new(1))
            .await
            .expect_err("denied");
        assert!(matches!(err, CommandError::PermissionDenied));
    }

    #[tokio::test]
    async fn owner_bypasses_the_staff_check() {
        let owner = ActorId::new(9);
        let commands = commands(Some(owner), vec![ActorId::new(1)]);
        let err = commands
            .show(owner, ReportId::new(1))
            .await
            .expect_err("not found");
        assert!(matches!(
            err,
            CommandError::NotFound(NotFoundKind::Report)
        ));
    }

    // ── Lookup commands ─────────────────────────────────────────────

    #[tokio::test]
    async fn show_renders_a_stored_report() {
        let commands = commands(None, Vec::new());
        let id = commands
            .store
            .insert(sample_report("alice"))
            .await
            .expect("insert");

        let text = commands.show(ActorId::new(1), id).await.expect("show");
        assert!(text.contains("alice's grief"));
        assert!(text.contains("Blocks affected: 120"));
    }

    #[tokio::test]
    async fn info_aggregates_a_subjects_history() {
        let commands = commands(None, Vec::new());
        commands
            .store
            .insert(sample_report("alice"))
            .await
            .expect("insert");
        commands
            .store
            .insert(sample_report("alice"))
            .await
            .expect("insert");

        let text = commands
            .info(ActorId::new(1), "alice")
            .await
            .expect("info");
        assert!(text.contains("Reports on file: 2"));
        assert!(text.contains("Blocks griefed: 240 broken, 120 average"));
    }

    #[tokio::test]
    async fn info_for_unknown_subject_is_not_found() {
        let commands = commands(None, Vec::new());
        let err = commands
            .info(ActorId::new(1), "nobody")
            .await
            .expect_err("not found");
        assert!(matches!(
            err,
            CommandError::NotFound(NotFoundKind::Subject)
        ));
    }
}
