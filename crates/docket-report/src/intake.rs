//! Intake scripts: the field specs a report session asks, in order.
//!
//! Each function builds one [`FieldSpec`] with its prompt wording,
//! retry wording and parse step. The specs are constructed fresh per
//! command invocation; nothing here is shared between sessions, and
//! in particular the evidence accumulator in [`collect_evidence`] is
//! a local created at the call.

use crate::parse;
use crate::vocab::{OffenseKind, Punishment};
use chrono::NaiveDate;
use docket_dialogue::{DialogueError, FieldSession, FieldSpec, Reply};
use docket_gateway::ChatGateway;

/// Subject username: one non-empty token.
#[must_use]
pub fn subject_field() -> FieldSpec<String> {
    FieldSpec::new(
        "subject",
        "Please send the username of the rule-breaker.",
        "Usernames are a single word. Try again.",
        |reply: &Reply| {
            let token = reply.as_text()?.trim();
            if token.is_empty() || token.contains(char::is_whitespace) {
                return None;
            }
            Some(token.to_string())
        },
    )
}

/// Offense kind, from the closed vocabulary.
#[must_use]
pub fn kind_field() -> FieldSpec<OffenseKind> {
    FieldSpec::new(
        "kind",
        "What type of offense happened? Types: grief, chat, hack, tunnel, or other.",
        "Unknown type. Answer one of: grief, chat, hack, tunnel, other.",
        |reply: &Reply| OffenseKind::parse(reply.as_text()?),
    )
}

/// Incident summary: any non-empty text.
#[must_use]
pub fn summary_field() -> FieldSpec<String> {
    FieldSpec::new(
        "summary",
        "Type a short summary of what happened.",
        "The summary cannot be empty. Try again.",
        |reply: &Reply| {
            let text = reply.as_text()?.trim();
            if text.is_empty() {
                return None;
            }
            Some(text.to_string())
        },
    )
}

/// Blocks affected: a plain number. Skippable when not applicable.
#[must_use]
pub fn blocks_field() -> FieldSpec<u32> {
    FieldSpec::new(
        "blocks",
        "Send how many blocks were affected, or press ✅ if not applicable.",
        "Incorrect input! Try sending a number this time.",
        |reply: &Reply| parse_blocks_reply(reply),
    )
    .skippable()
}

fn parse_blocks_reply(reply: &Reply) -> Option<u32> {
    parse::parse_blocks(reply.as_text()?)
}

/// Offense date: `DD/MM` of the current year or `today`. Skippable;
/// a skip means "today".
#[must_use]
pub fn happened_at_field(today: NaiveDate) -> FieldSpec<NaiveDate> {
    FieldSpec::new(
        "happened_at",
        "When did this occur? Format: DD/MM, or `today`. Press ✅ for today.",
        "Incorrect input! Format: DD/MM, or `today`.",
        move |reply: &Reply| parse::parse_happened_at(reply.as_text()?, today),
    )
    .skippable()
}

/// Punishment, from the closed vocabulary. Skippable; a skip means
/// no punishment recorded.
#[must_use]
pub fn punishment_field() -> FieldSpec<Punishment> {
    FieldSpec::new(
        "punishment",
        "What punishment did the user get? One of: tban, pban, mute, pmute, kick, warn, null. \
         Press ✅ if none.",
        "Unknown punishment. One of: tban, pban, mute, pmute, kick, warn, null.",
        |reply: &Reply| Punishment::parse(reply.as_text()?),
    )
    .skippable()
}

/// One evidence batch: every link in the reply's text plus its
/// attachments. A reply with no links is rejected so the operator is
/// re-prompted rather than silently ignored.
fn evidence_field(prompt: &str) -> FieldSpec<Vec<String>> {
    FieldSpec::new(
        "evidence",
        prompt,
        "No links found there. Keep sending evidence, or press ✅ to finish.",
        |reply: &Reply| {
            let mut links = parse::extract_links(reply.as_text()?);
            links.extend(reply.attachments().iter().cloned());
            if links.is_empty() {
                return None;
            }
            Some(links)
        },
    )
    .skippable()
}

/// Collects evidence links across any number of messages.
///
/// The accumulator lives here, created fresh for this call; it never
/// leaks into another session. The confirm glyph ends the loop, so an
/// operator with no evidence can skip straight through the opening
/// prompt.
///
/// # Errors
///
/// [`DialogueError::Cancelled`] propagates from any prompt and aborts
/// the whole session.
pub async fn collect_evidence<G: ChatGateway + ?Sized>(
    session: &mut FieldSession<G>,
) -> Result<Vec<String>, DialogueError> {
    let mut links = Vec::new();

    let opening = evidence_field(
        "Send proof images or links, in as many messages as you need. Press ✅ when done.",
    );
    match session.collect(&opening).await? {
        Some(batch) => links.extend(batch),
        None => return Ok(links),
    }

    let more = evidence_field("Got it. Keep sending proof, or press ✅ to finish.");
    while let Some(batch) = session.collect(&more).await? {
        links.extend(batch);
    }
    Ok(links)
}

/// What an evidence edit does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceAction {
    /// Append links to the existing list.
    Add,
    /// Drop every link on the report.
    Remove,
}

/// Asks whether an evidence edit adds links or clears them.
#[must_use]
pub fn evidence_action_field() -> FieldSpec<EvidenceAction> {
    FieldSpec::new(
        "evidence_action",
        "Do you want to `add` evidence links or `remove` them all?",
        "Answer `add` or `remove`.",
        |reply: &Reply| match reply.as_text()?.trim().to_ascii_lowercase().as_str() {
            "add" => Some(EvidenceAction::Add),
            "remove" => Some(EvidenceAction::Remove),
            _ => None,
        },
    )
}

/// Which report field an edit command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// Subject username.
    Username,
    /// Offense kind.
    Kind,
    /// Summary text.
    Summary,
    /// Blocks affected.
    Blocks,
    /// Evidence links.
    Evidence,
    /// Offense date.
    HappenedAt,
    /// Punishment.
    Punishment,
}

impl EditTarget {
    /// Parses the field name as operators spell it, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "username" => Some(Self::Username),
            "type" => Some(Self::Kind),
            "summary" => Some(Self::Summary),
            "blocks" => Some(Self::Blocks),
            "image links" | "image_links" => Some(Self::Evidence),
            "happened at" | "happened_at" => Some(Self::HappenedAt),
            "punishment" => Some(Self::Punishment),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Field parse steps ───────────────────────────────────────────

    #[test]
    fn subject_accepts_one_token() {
        let spec = subject_field();
        assert!(!spec.is_skippable());
        assert_eq!(spec.parse(&Reply::text(" alice ")), Some("alice".into()));
        assert_eq!(spec.parse(&Reply::text("two words")), None);
        assert_eq!(spec.parse(&Reply::text("")), None);
    }

    #[test]
    fn kind_uses_the_vocabulary() {
        let spec = kind_field();
        assert_eq!(spec.parse(&Reply::text("Grief")), Some(OffenseKind::Grief));
        assert_eq!(spec.parse(&Reply::text("arson")), None);
    }

    #[test]
    fn summary_rejects_blank_text() {
        let spec = summary_field();
        assert_eq!(
            spec.parse(&Reply::text("flattened spawn")),
            Some("flattened spawn".into())
        );
        assert_eq!(spec.parse(&Reply::text("   ")), None);
    }

    #[test]
    fn blocks_is_skippable_and_numeric() {
        let spec = blocks_field();
        assert!(spec.is_skippable());
        assert_eq!(spec.parse(&Reply::text("42")), Some(42));
        assert_eq!(spec.parse(&Reply::text("a lot")), None);
    }

    #[test]
    fn happened_at_binds_todays_year() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).expect("valid date");
        let spec = happened_at_field(today);
        assert!(spec.is_skippable());
        assert_eq!(
            spec.parse(&Reply::text("30/07")),
            NaiveDate::from_ymd_opt(2026, 7, 30)
        );
        assert_eq!(spec.parse(&Reply::text("today")), Some(today));
        assert_eq!(spec.parse(&Reply::text("31/02")), None);
    }

    #[test]
    fn punishment_uses_the_vocabulary() {
        let spec = punishment_field();
        assert!(spec.is_skippable());
        assert_eq!(spec.parse(&Reply::text("tban")), Some(Punishment::TempBan));
        assert_eq!(spec.parse(&Reply::text("execution")), None);
    }

    #[test]
    fn evidence_merges_text_links_and_attachments() {
        let spec = evidence_field("Send proof.");
        let reply = Reply::text_with_attachments(
            "see https://img.example/a.png",
            vec!["https://cdn.example/b.png".into()],
        );
        assert_eq!(
            spec.parse(&reply),
            Some(vec![
                "https://img.example/a.png".to_string(),
                "https://cdn.example/b.png".to_string()
            ])
        );
    }

    #[test]
    fn evidence_rejects_linkless_replies() {
        let spec = evidence_field("Send proof.");
        assert_eq!(spec.parse(&Reply::text("trust me")), None);
    }

    // ── Edit vocabulary ─────────────────────────────────────────────

    #[test]
    fn evidence_action_parses_add_and_remove() {
        let spec = evidence_action_field();
        assert_eq!(
            spec.parse(&Reply::text(" Add ")),
            Some(EvidenceAction::Add)
        );
        assert_eq!(
            spec.parse(&Reply::text("remove")),
            Some(EvidenceAction::Remove)
        );
        assert_eq!(spec.parse(&Reply::text("delete")), None);
    }

    #[test]
    fn edit_targets_parse_operator_spelling() {
        assert_eq!(EditTarget::parse("username"), Some(EditTarget::Username));
        assert_eq!(EditTarget::parse("TYPE"), Some(EditTarget::Kind));
        assert_eq!(EditTarget::parse("image links"), Some(EditTarget::Evidence));
        assert_eq!(
            EditTarget::parse("happened at"),
            Some(EditTarget::HappenedAt)
        );
        assert_eq!(EditTarget::parse("rollback"), None);
    }
}
