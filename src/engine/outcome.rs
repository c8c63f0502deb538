//! engine::outcome
//!
//! The result of one hook run and the errors that end it.
//!
//! Every run ends in exactly one [`HookOutcome`]. There is no partial
//! success: a push is admitted with all uploads drained, or it is not.

use thiserror::Error;

use super::dispatch::DispatchFailure;
use crate::core::locks::LockIndexError;
use crate::locks::LockError;

/// Errors that end a hook run without admitting the push.
#[derive(Debug, Error)]
pub enum HookError {
    /// No remote argument was given.
    #[error("This should be run through Git's pre-push hook.")]
    MissingRemote,

    /// The remote argument is not usable.
    #[error("Invalid remote name \"{0}\"")]
    InvalidRemote(String),

    /// No lock registry client could be built.
    #[error("Unable to create lock system: {0}")]
    LockSystem(String),

    /// The lock snapshot could not be fetched.
    #[error("error finding locks: {0}")]
    Registry(LockError),

    /// The lock snapshot is inconsistent.
    #[error(transparent)]
    DuplicateLock(#[from] LockIndexError),

    /// A ref update's commit range could not be scanned.
    #[error("Error scanning for large files in \"{revision}\": {message}")]
    Scan {
        /// Local revision being scanned
        revision: String,
        /// Scanner error
        message: String,
    },

    /// Hook input could not be read.
    #[error("failed to read hook input: {0}")]
    Input(std::io::Error),

    /// One or more uploads failed while draining.
    #[error("{} upload(s) failed", .0.len())]
    Upload(Vec<DispatchFailure>),
}

// Causes are folded into the message, so these are not error sources.
impl From<LockError> for HookError {
    fn from(err: LockError) -> Self {
        HookError::Registry(err)
    }
}

impl From<std::io::Error> for HookError {
    fn from(err: std::io::Error) -> Self {
        HookError::Input(err)
    }
}

/// How a hook run ended.
#[derive(Debug)]
pub enum HookOutcome {
    /// Every ref update cleared the lock check and every upload finished.
    Admitted {
        /// Paths locked by the pusher that this push touches
        owned_locks: Vec<String>,
        /// Number of ref updates handed to the dispatcher
        dispatched: usize,
        /// Number of objects uploaded
        uploaded: usize,
    },

    /// A ref update touches objects locked by someone else.
    Rejected {
        /// Local revision of the offending update
        local_revision: String,
        /// Remote being pushed to
        remote: String,
        /// Conflicting paths, in discovery order
        conflicts: Vec<String>,
    },

    /// The run failed for a reason other than a lock conflict.
    Failed(HookError),
}

impl HookOutcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            HookOutcome::Admitted { .. } => 0,
            HookOutcome::Rejected { .. } | HookOutcome::Failed(_) => 1,
        }
    }

    /// Whether the push may proceed.
    pub fn is_admitted(&self) -> bool {
        matches!(self, HookOutcome::Admitted { .. })
    }
}

impl From<HookError> for HookOutcome {
    fn from(err: HookError) -> Self {
        HookOutcome::Failed(err)
    }
}
