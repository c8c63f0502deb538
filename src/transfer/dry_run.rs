//! transfer::dry_run
//!
//! Uploader used for `--dry-run`: reports what would be pushed.

use async_trait::async_trait;

use super::traits::{TransferError, Uploader};
use crate::core::objects::TrackedObject;
use crate::ui::output::{self, Verbosity};

/// Prints `push <oid> => <path>` instead of transferring.
#[derive(Debug, Clone, Copy)]
pub struct DryRunUploader {
    verbosity: Verbosity,
}

impl DryRunUploader {
    /// Create a dry-run uploader printing at `verbosity`.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// The line printed for an object.
    pub fn describe(object: &TrackedObject) -> String {
        format!("push {} => {}", object.name, object.path)
    }
}

#[async_trait]
impl Uploader for DryRunUploader {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn upload(&self, _remote: &str, object: &TrackedObject) -> Result<(), TransferError> {
        output::print(Self::describe(object), self.verbosity);
        Ok(())
    }
}
