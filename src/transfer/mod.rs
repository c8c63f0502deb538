//! transfer
//!
//! Abstraction over the object upload pipeline.
//!
//! # Implementations
//!
//! - [`GitLfsUploader`] - pushes each object with `git lfs push --object-id`
//! - [`DryRunUploader`] - prints what would be pushed
//! - [`mock::MockUploader`] - records uploads for tests

pub mod dry_run;
pub mod lfs;
pub mod mock;
mod traits;

pub use dry_run::DryRunUploader;
pub use lfs::GitLfsUploader;
pub use traits::{TransferError, Uploader};
