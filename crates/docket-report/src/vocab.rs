//! Offense and punishment vocabularies.
//!
//! Both are closed sets parsed case-insensitively from operator text.
//! The parse functions return `Option` rather than `Result` because
//! inside an intake session a miss just means "ask again".

use serde::{Deserialize, Serialize};

/// What kind of rule-breaking a report records.
///
/// # Example
///
/// ```
/// use docket_report::OffenseKind;
///
/// assert_eq!(OffenseKind::parse("Grief"), Some(OffenseKind::Grief));
/// assert_eq!(OffenseKind::parse("arson"), None);
/// assert_eq!(OffenseKind::Grief.descriptor(), "griefer");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffenseKind {
    /// Destroyed or vandalized builds.
    Grief,
    /// Chat abuse.
    Chat,
    /// Client-side cheating.
    Hack,
    /// Dug long ugly tunnels through the map.
    Tunnel,
    /// Anything else.
    Other,
}

impl OffenseKind {
    /// Every kind, in canonical prompt order.
    pub const ALL: [Self; 5] = [
        Self::Grief,
        Self::Chat,
        Self::Hack,
        Self::Tunnel,
        Self::Other,
    ];

    /// Parses an operator token, case-insensitively.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "grief" => Some(Self::Grief),
            "chat" => Some(Self::Chat),
            "hack" => Some(Self::Hack),
            "tunnel" => Some(Self::Tunnel),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// The canonical token operators type.
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            Self::Grief => "grief",
            Self::Chat => "chat",
            Self::Hack => "hack",
            Self::Tunnel => "tunnel",
            Self::Other => "other",
        }
    }

    /// A noun describing someone who committed this offense, used in
    /// offender summaries.
    #[must_use]
    pub fn descriptor(&self) -> &'static str {
        match self {
            Self::Grief => "griefer",
            Self::Chat => "chat abuser",
            Self::Hack => "hacker",
            Self::Tunnel => "tunneler",
            Self::Other => "abuser",
        }
    }
}

impl std::fmt::Display for OffenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// What punishment the subject received, if any.
///
/// `Punishment::None` (token `null`) means the report was recorded
/// without a punishment; it is excluded from summary counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Punishment {
    /// Temporary ban.
    #[serde(rename = "tban")]
    TempBan,
    /// Permanent ban.
    #[serde(rename = "pban")]
    PermBan,
    /// Temporary mute.
    Mute,
    /// Permanent mute.
    #[serde(rename = "pmute")]
    PermMute,
    /// Kicked from the server.
    Kick,
    /// Warned.
    Warn,
    /// Recorded without punishment.
    #[serde(rename = "null")]
    None,
}

impl Punishment {
    /// Every punishment, in canonical prompt order.
    pub const ALL: [Self; 7] = [
        Self::TempBan,
        Self::PermBan,
        Self::Mute,
        Self::PermMute,
        Self::Kick,
        Self::Warn,
        Self::None,
    ];

    /// Parses an operator token, case-insensitively.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "tban" => Some(Self::TempBan),
            "pban" => Some(Self::PermBan),
            "mute" => Some(Self::Mute),
            "pmute" => Some(Self::PermMute),
            "kick" => Some(Self::Kick),
            "warn" => Some(Self::Warn),
            "null" => Some(Self::None),
            _ => None,
        }
    }

    /// The canonical token operators type.
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            Self::TempBan => "tban",
            Self::PermBan => "pban",
            Self::Mute => "mute",
            Self::PermMute => "pmute",
            Self::Kick => "kick",
            Self::Warn => "warn",
            Self::None => "null",
        }
    }

    /// Returns `true` if a punishment was actually applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for Punishment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}
