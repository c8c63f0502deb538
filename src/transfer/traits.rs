//! transfer::traits
//!
//! Uploader trait definition.
//!
//! # Design
//!
//! An `Uploader` moves one large object to the remote object store. It owns
//! its concurrency limit; callers may invoke `upload` from as many tasks as
//! they like. Objects already present remotely are the uploader's concern to
//! skip.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::objects::TrackedObject;

/// Errors from uploading a single object.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    /// The upload program could not be started.
    #[error("failed to start '{program}': {message}")]
    Spawn {
        /// Program that was invoked
        program: String,
        /// OS error description
        message: String,
    },

    /// The upload program exited unsuccessfully.
    #[error("upload exited with {}: {stderr}", exit_label(.status))]
    CommandFailed {
        /// Exit code, `None` if killed by a signal
        status: Option<i32>,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// The object store refused the object.
    #[error("rejected: {0}")]
    Rejected(String),
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// Transfers large objects to a remote.
///
/// Implementations must be `Send + Sync`; uploads run on spawned tasks.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Uploader kind (e.g., "git-lfs", "dry-run").
    fn name(&self) -> &'static str;

    /// Upload one object to `remote`.
    ///
    /// # Errors
    ///
    /// Any failure to transfer the object.
    async fn upload(&self, remote: &str, object: &TrackedObject) -> Result<(), TransferError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_display() {
        let err = TransferError::CommandFailed {
            status: Some(2),
            stderr: "batch request failed".into(),
        };
        assert_eq!(
            err.to_string(),
            "upload exited with status 2: batch request failed"
        );

        let killed = TransferError::CommandFailed {
            status: None,
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("signal"));
    }

    #[test]
    fn spawn_display() {
        let err = TransferError::Spawn {
            program: "git".into(),
            message: "not found".into(),
        };
        assert_eq!(err.to_string(), "failed to start 'git': not found");
    }
}
