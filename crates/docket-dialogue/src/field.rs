//! Field specifications.
//!
//! A [`FieldSpec`] describes one question: the prompt, the wording
//! used when an answer is rejected, whether the operator may skip,
//! and how to turn a raw reply into a typed value. Validation and
//! transformation are one fallible step: `parse` returning `None`
//! rejects the reply and the collector re-prompts.

use crate::reply::Reply;

/// Specification for one collectable field.
///
/// Immutable once built; constructed per command invocation by the
/// intake scripts.
///
/// # Example
///
/// ```
/// use docket_dialogue::{FieldSpec, Reply};
///
/// let blocks = FieldSpec::new(
///     "blocks",
///     "How many blocks were affected?",
///     "Please give a plain number.",
///     |reply: &Reply| reply.as_text()?.trim().parse::<u32>().ok(),
/// )
/// .skippable();
///
/// assert!(blocks.is_skippable());
/// assert_eq!(blocks.parse(&Reply::text("42")), Some(42));
/// assert_eq!(blocks.parse(&Reply::text("a lot")), None);
/// ```
pub struct FieldSpec<T> {
    name: &'static str,
    prompt: String,
    retry: String,
    skippable: bool,
    parse: Box<dyn Fn(&Reply) -> Option<T> + Send + Sync>,
}

impl<T> FieldSpec<T> {
    /// Creates a non-skippable field spec.
    #[must_use]
    pub fn new(
        name: &'static str,
        prompt: impl Into<String>,
        retry: impl Into<String>,
        parse: impl Fn(&Reply) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            prompt: prompt.into(),
            retry: retry.into(),
            skippable: false,
            parse: Box::new(parse),
        }
    }

    /// Marks the field skippable: the confirm glyph resolves it with
    /// no value, without invoking `parse`.
    #[must_use]
    pub fn skippable(mut self) -> Self {
        self.skippable = true;
        self
    }

    /// Short field name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Prompt shown on the first attempt.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Prompt shown after a rejected answer.
    #[must_use]
    pub fn retry(&self) -> &str {
        &self.retry
    }

    /// Returns `true` if the operator may skip this field.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        self.skippable
    }

    /// Validates and transforms a raw reply in one step.
    ///
    /// `None` means the reply was rejected and the field should be
    /// asked again.
    #[must_use]
    pub fn parse(&self, reply: &Reply) -> Option<T> {
        (self.parse)(reply)
    }
}

impl<T> std::fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("skippable", &self.skippable)
            .finish_non_exhaustive()
    }
}
