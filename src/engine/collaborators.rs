//! engine::collaborators
//!
//! Traits for the repository-side collaborators of admission.
//!
//! # Design
//!
//! The controller never touches the repository directly. It asks a
//! [`RemoteValidator`] whether the push target is usable, an
//! [`IdentityProvider`] who is pushing, and an [`ObjectScanner`] which large
//! objects a ref update carries. [`Git`] implements all three; tests script
//! them.
//!
//! These traits are synchronous: scanning is local CPU and disk work and the
//! controller reads its input sequentially on one task.

use thiserror::Error;

use crate::core::objects::TrackedObject;
use crate::core::refs::RefUpdate;
use crate::core::types::Committer;
use crate::git::Git;

/// A failed scan of one ref update.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ScanError {
    /// Revision whose range could not be scanned
    pub revision: String,
    /// What went wrong
    pub message: String,
}

/// Checks the remote named on the hook command line.
pub trait RemoteValidator {
    /// Succeed if `name` is a usable push target.
    fn validate_remote(&self, name: &str) -> Result<(), String>;
}

/// Supplies the identity lock ownership is judged against.
pub trait IdentityProvider {
    /// The current committer's name and email.
    fn current_committer(&self) -> Committer;
}

/// Lists the large objects a ref update would push.
pub trait ObjectScanner {
    /// Objects reachable from the update's local revision and not from its
    /// excluded remote revision, in discovery order.
    fn scan(&self, remote: &str, update: &RefUpdate) -> Result<Vec<TrackedObject>, ScanError>;
}

impl RemoteValidator for Git {
    fn validate_remote(&self, name: &str) -> Result<(), String> {
        Git::validate_remote(self, name).map_err(|e| e.to_string())
    }
}

impl IdentityProvider for Git {
    fn current_committer(&self) -> Committer {
        Git::current_committer(self)
    }
}

impl ObjectScanner for Git {
    fn scan(&self, remote: &str, update: &RefUpdate) -> Result<Vec<TrackedObject>, ScanError> {
        self.scan_range(remote, update).map_err(|e| ScanError {
            revision: update.local_revision.clone(),
            message: e.to_string(),
        })
    }
}

/// A fixed committer, for callers that already know who is pushing.
impl IdentityProvider for Committer {
    fn current_committer(&self) -> Committer {
        self.clone()
    }
}
