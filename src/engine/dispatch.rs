//! engine::dispatch
//!
//! Asynchronous upload dispatch with a single drain barrier.
//!
//! # Design
//!
//! `enqueue` spawns one task per object onto a [`JoinSet`] and returns at
//! once, so the controller keeps reading hook input while uploads run. The
//! uploader owns the concurrency limit. `await_all` joins every task and
//! reports all failures, each with the ref update and object it belongs to.
//!
//! When a run is rejected the dispatcher is detached rather than dropped:
//! uploads already started are left to finish on their own instead of being
//! aborted.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;

use crate::core::objects::TrackedObject;
use crate::core::refs::RefUpdate;
use crate::transfer::{TransferError, Uploader};
use crate::ui::output::{self, Verbosity};

/// One unit of dispatched work that did not complete.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchFailure {
    /// The uploader reported an error for an object.
    #[error("{local_revision}: {} ({}): {error}", .object.path, .object.name)]
    Upload {
        /// Local revision of the ref update the object belongs to
        local_revision: String,
        /// The object that failed
        object: TrackedObject,
        /// Why it failed
        error: TransferError,
    },

    /// An upload task ended without reporting (panicked or was cancelled).
    #[error("upload task did not complete: {0}")]
    Aborted(String),
}

/// Drives uploads for admitted ref updates.
pub struct UploadDispatcher {
    uploader: Arc<dyn Uploader>,
    remote: Arc<str>,
    tasks: JoinSet<Result<(), DispatchFailure>>,
    enqueued: usize,
    verbosity: Verbosity,
}

impl std::fmt::Debug for UploadDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadDispatcher")
            .field("uploader", &self.uploader.name())
            .field("remote", &self.remote)
            .field("outstanding", &self.tasks.len())
            .field("enqueued", &self.enqueued)
            .finish()
    }
}

impl UploadDispatcher {
    /// Create a dispatcher uploading to `remote`.
    pub fn new(uploader: Arc<dyn Uploader>, remote: &str, verbosity: Verbosity) -> Self {
        Self {
            uploader,
            remote: Arc::from(remote),
            tasks: JoinSet::new(),
            enqueued: 0,
            verbosity,
        }
    }

    /// Schedule uploads for one ref update's objects without waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue(&mut self, update: &RefUpdate, objects: Vec<TrackedObject>) {
        self.enqueued += 1;
        output::debug(
            format!(
                "dispatching {} object(s) for {} via {}",
                objects.len(),
                update,
                self.uploader.name()
            ),
            self.verbosity,
        );

        for object in objects {
            let uploader = Arc::clone(&self.uploader);
            let remote = Arc::clone(&self.remote);
            let local_revision = update.local_revision.clone();
            self.tasks.spawn(async move {
                let result = uploader.upload(&remote, &object).await;
                result.map_err(|error| DispatchFailure::Upload {
                    local_revision,
                    object,
                    error,
                })
            });
        }
    }

    /// Number of `enqueue` calls so far.
    pub fn enqueued(&self) -> usize {
        self.enqueued
    }

    /// Number of object uploads not yet joined.
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every scheduled upload.
    ///
    /// Returns the number of objects uploaded, or every failure.
    pub async fn await_all(mut self) -> Result<usize, Vec<DispatchFailure>> {
        let mut uploaded = 0;
        let mut failures = Vec::new();

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Ok(())) => uploaded += 1,
                Ok(Err(failure)) => failures.push(failure),
                Err(e) => failures.push(DispatchFailure::Aborted(e.to_string())),
            }
        }

        if failures.is_empty() {
            Ok(uploaded)
        } else {
            Err(failures)
        }
    }

    /// Stop tracking outstanding uploads without cancelling them.
    pub fn detach(mut self) {
        output::debug(
            format!("leaving {} upload(s) in flight", self.tasks.len()),
            self.verbosity,
        );
        self.tasks.detach_all();
    }
}
