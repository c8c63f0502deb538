//! core::locks
//!
//! Lock records and the per-push lock index.
//!
//! # Invariants
//!
//! - A [`LockIndex`] is built once per hook invocation and never refreshed,
//!   so every ref update in a push is judged against the same snapshot.
//! - At most one lock exists per path. A registry answer that violates this
//!   is rejected instead of silently keeping one of the records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::types::Committer;

/// Errors from building a lock index.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LockIndexError {
    /// The registry returned two locks for the same path.
    #[error("lock registry returned more than one lock for '{path}'")]
    DuplicatePath {
        /// The path locked twice
        path: String,
    },
}

/// An active lock, as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRecord {
    /// Registry-assigned lock id (may be empty for registries that omit it)
    pub id: String,
    /// Repository path of the locked object
    pub path: String,
    /// Name of the lock owner
    pub owner_name: String,
    /// Email of the lock owner (empty when the registry does not report one)
    pub owner_email: String,
    /// When the lock was taken, if known
    pub locked_at: Option<DateTime<Utc>>,
}

impl LockRecord {
    /// Create a lock record with only the fields admission needs.
    pub fn new(
        path: impl Into<String>,
        owner_name: impl Into<String>,
        owner_email: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            path: path.into(),
            owner_name: owner_name.into(),
            owner_email: owner_email.into(),
            locked_at: None,
        }
    }

    /// Whether the given committer holds this lock.
    ///
    /// Both name and email have to match.
    pub fn is_owned_by(&self, committer: &Committer) -> bool {
        self.owner_name == committer.name && self.owner_email == committer.email
    }
}

/// Active locks keyed by path.
#[derive(Debug, Clone, Default)]
pub struct LockIndex {
    by_path: HashMap<String, LockRecord>,
}

impl LockIndex {
    /// Index a full list of active locks.
    ///
    /// # Errors
    ///
    /// Returns [`LockIndexError::DuplicatePath`] if two records share a path.
    pub fn build(locks: Vec<LockRecord>) -> Result<Self, LockIndexError> {
        let mut by_path = HashMap::with_capacity(locks.len());
        for lock in locks {
            if by_path.contains_key(&lock.path) {
                return Err(LockIndexError::DuplicatePath { path: lock.path });
            }
            by_path.insert(lock.path.clone(), lock);
        }
        Ok(Self { by_path })
    }

    /// Look up the lock on a path.
    pub fn get(&self, path: &str) -> Option<&LockRecord> {
        self.by_path.get(path)
    }

    /// Number of indexed locks.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Whether no locks are active.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// All locks, sorted by path.
    pub fn sorted(&self) -> Vec<&LockRecord> {
        let mut locks: Vec<&LockRecord> = self.by_path.values().collect();
        locks.sort_by(|a, b| a.path.cmp(&b.path));
        locks
    }
}
