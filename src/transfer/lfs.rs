//! transfer::lfs
//!
//! Uploader that delegates to `git lfs push --object-id`.
//!
//! # Design
//!
//! Each object is pushed by its own child process so that a failure names
//! exactly one object. A semaphore caps how many children run at once.
//! Children are not killed when their task is dropped: an upload already
//! started is allowed to finish even if the hook exits early.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;

use super::traits::{TransferError, Uploader};
use crate::core::objects::TrackedObject;

/// Uploads objects by running `<program> lfs push --object-id <remote> <oid>`.
#[derive(Debug, Clone)]
pub struct GitLfsUploader {
    /// Executable to run, usually `git`
    program: String,
    /// Working directory (repository root)
    cwd: std::path::PathBuf,
    /// Bounds concurrent child processes
    permits: Arc<Semaphore>,
}

impl GitLfsUploader {
    /// Create an uploader running `program` in `cwd`, at most `concurrency` at a time.
    ///
    /// A concurrency of zero is treated as one.
    pub fn new(
        program: impl Into<String>,
        cwd: impl Into<std::path::PathBuf>,
        concurrency: usize,
    ) -> Self {
        Self {
            program: program.into(),
            cwd: cwd.into(),
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Arguments passed to the program for one object.
    fn args<'a>(remote: &'a str, object: &'a TrackedObject) -> [&'a str; 5] {
        ["lfs", "push", "--object-id", remote, object.name.as_str()]
    }
}

#[async_trait]
impl Uploader for GitLfsUploader {
    fn name(&self) -> &'static str {
        "git-lfs"
    }

    async fn upload(&self, remote: &str, object: &TrackedObject) -> Result<(), TransferError> {
        // Closed only if the semaphore is dropped, which cannot happen while &self lives
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| TransferError::Rejected(e.to_string()))?;

        let output = Command::new(&self.program)
            .args(Self::args(remote, object))
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| TransferError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(TransferError::CommandFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
