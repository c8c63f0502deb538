//! lfsgate - Pre-push admission gate for large-file locks
//!
//! lfsgate runs from Git's pre-push hook. Before any large object leaves the
//! machine it checks every path the push touches against the lock registry,
//! and refuses the whole push if someone else holds a lock on one of them.
//! Pushes that pass have their large objects uploaded before Git is allowed
//! to continue.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Snapshot, evaluate, dispatch and drain for one push
//! - [`core`] - Domain types: ref updates, pointers, locks, configuration
//! - [`git`] - Single interface for all Git operations
//! - [`locks`] - Lock registry clients
//! - [`transfer`] - Large object upload pipelines
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! 1. One lock snapshot per run; a failed query rejects the push
//! 2. No object is uploaded before its ref update clears the lock check
//! 3. Any conflict with another user's lock rejects the entire push
//! 4. A push is admitted only once every upload has finished

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod locks;
pub mod transfer;
pub mod ui;
