//! git
//!
//! Single interface for all repository access.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module imports
//! `git2`. Reads go through `git2` exclusively; the one place that shells out
//! is the upload pipeline in [`crate::transfer`], which is an external tool.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Remote validation and URL lookup
//! - Committer identity
//! - Lock registry endpoint resolution
//! - Scanning commit ranges for large-file pointers
//!
//! # Example
//!
//! ```ignore
//! use lfsgate::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! git.validate_remote("origin")?;
//! let me = git.current_committer();
//! ```

mod interface;

pub use interface::{derive_lfs_endpoint, looks_like_url, Git, GitError};
