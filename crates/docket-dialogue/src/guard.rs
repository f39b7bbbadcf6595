//! Per-actor serialization guard.
//!
//! At most one field-collection session may be in flight per actor:
//! a second command while the first is still prompting would race it
//! for the same reply stream. [`ActorGuard::acquire`] marks an actor
//! busy and hands back a [`SessionPermit`] whose `Drop` clears the
//! mark, so release happens on every exit path: success,
//! cancellation, fault, or unwind.
//!
//! The busy set is the only shared mutable state in the engine. The
//! mutex is never held across an await, so check-and-mark is atomic
//! with respect to the cooperative scheduler.

use crate::error::DialogueError;
use docket_types::ActorId;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Process-wide set of actors with a session in flight.
///
/// Cheap to clone; clones share the same busy set.
///
/// # Example
///
/// ```
/// use docket_dialogue::ActorGuard;
/// use docket_types::ActorId;
///
/// let guard = ActorGuard::new();
/// let actor = ActorId::new(1);
///
/// let permit = guard.acquire(actor).expect("first acquire");
/// assert!(guard.acquire(actor).is_err());
///
/// drop(permit);
/// assert!(guard.acquire(actor).is_ok());
/// ```
#[derive(Clone)]
pub struct ActorGuard {
    busy: Arc<Mutex<HashSet<ActorId>>>,
}

impl ActorGuard {
    /// Creates a guard with no busy actors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            busy: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Marks the actor busy and returns the release token.
    ///
    /// # Errors
    ///
    /// Returns [`DialogueError::AlreadyInSession`] if the actor is
    /// already busy; the busy set is left unchanged.
    pub fn acquire(&self, actor: ActorId) -> Result<SessionPermit, DialogueError> {
        let mut busy = self.busy.lock();
        if !busy.insert(actor) {
            return Err(DialogueError::AlreadyInSession { actor });
        }
        drop(busy);

        tracing::debug!(%actor, "session guard acquired");
        Ok(SessionPermit {
            actor,
            busy: Arc::clone(&self.busy),
        })
    }

    /// Acquires unless the actor is the exempt owner.
    ///
    /// The owner bypasses serialization entirely: no mark is taken,
    /// so nothing needs releasing and the owner is never refused.
    /// The exemption is decided here, before acquisition.
    ///
    /// # Errors
    ///
    /// Same as [`acquire`](Self::acquire) for non-owner actors.
    pub fn acquire_for(
        &self,
        actor: ActorId,
        owner: Option<ActorId>,
    ) -> Result<Option<SessionPermit>, DialogueError> {
        if owner == Some(actor) {
            tracing::debug!(%actor, "owner exempt from session guard");
            return Ok(None);
        }
        self.acquire(actor).map(Some)
    }

    /// Returns `true` if the actor has a session in flight.
    #[must_use]
    pub fn is_busy(&self, actor: ActorId) -> bool {
        self.busy.lock().contains(&actor)
    }

    /// Number of sessions currently in flight.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.busy.lock().len()
    }
}

impl Default for ActorGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ActorGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorGuard")
            .field("active_sessions", &self.active_sessions())
            .finish()
    }
}

/// Release token for one acquired actor.
///
/// Dropping the permit clears the actor's busy mark. Hold it for the
/// session's whole dynamic extent and no longer.
pub struct SessionPermit {
    actor: ActorId,
    busy: Arc<Mutex<HashSet<ActorId>>>,
}

impl SessionPermit {
    /// The actor this permit marks busy.
    #[must_use]
    pub fn actor(&self) -> ActorId {
        self.actor
    }
}

impl Drop for SessionPermit {
    fn drop(&mut self) {
        self.busy.lock().remove(&self.actor);
        tracing::debug!(actor = %self.actor, "session guard released");
    }
}

impl std::fmt::Debug for SessionPermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPermit")
            .field("actor", &self.actor)
            .finish()
    }
}
