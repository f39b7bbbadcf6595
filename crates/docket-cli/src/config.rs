//! Console configuration.
//!
//! Loaded from a TOML file, with every field optional:
//!
//! ```toml
//! owner = 1
//! actor = 7
//! channel = 9
//! staff = [7, 12]
//! log_filter = "docket=debug"
//! ```
//!
//! A missing file means defaults; a file that exists but does not
//! parse is an error, so a typo never silently reverts the shell to
//! defaults.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocketConfig {
    /// Actor id exempt from session serialization. No owner by
    /// default.
    pub owner: Option<u64>,

    /// Actor id the console speaks as until `/actor` switches it.
    pub actor: u64,

    /// Channel id the console simulates.
    pub channel: u64,

    /// Actor ids allowed to run report commands. Empty means
    /// everyone.
    pub staff: Vec<u64>,

    /// Default tracing filter, overridden by `RUST_LOG`.
    pub log_filter: String,
}

impl Default for DocketConfig {
    fn default() -> Self {
        Self {
            owner: None,
            actor: 1,
            channel: 1,
            staff: Vec::new(),
            log_filter: "docket=info,warn".to_string(),
        }
    }
}

impl DocketConfig {
    /// Loads the config file, or defaults when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", path.display()));
            }
        };
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }
}
