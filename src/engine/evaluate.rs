//! engine::evaluate
//!
//! Conflict evaluation: which touched objects are locked, and by whom.
//!
//! # Design
//!
//! Evaluation happens before anything is dispatched for a ref update, since
//! bytes already sent cannot be recalled. Objects are checked in the order
//! the scanner produced them.
//!
//! The ledger is append-only for a run. A path already recorded is not
//! recorded again, so an object changed several times in one push is
//! reported once.

use crate::core::locks::LockIndex;
use crate::core::objects::TrackedObject;
use crate::core::types::Committer;

/// Lock findings accumulated across the ref updates of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockLedger {
    conflicts: Vec<String>,
    owned: Vec<String>,
}

impl LockLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the objects of one ref update against the lock index.
    ///
    /// Returns the number of new conflicts this update added.
    pub fn evaluate(
        &mut self,
        index: &LockIndex,
        committer: &Committer,
        objects: &[TrackedObject],
    ) -> usize {
        let before = self.conflicts.len();

        for object in objects {
            let Some(lock) = index.get(&object.path) else {
                continue;
            };
            let bucket = if lock.is_owned_by(committer) {
                &mut self.owned
            } else {
                &mut self.conflicts
            };
            if !bucket.contains(&lock.path) {
                bucket.push(lock.path.clone());
            }
        }

        self.conflicts.len() - before
    }

    /// Paths locked by someone else.
    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    /// Paths locked by the committer.
    pub fn owned(&self) -> &[String] {
        &self.owned
    }

    /// Whether any conflict has been recorded.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Consume the ledger, returning (conflicts, owned).
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.conflicts, self.owned)
    }
}
