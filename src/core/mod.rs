//! core
//!
//! Domain types and configuration for lfsgate.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, Committer
//! - [`refs`] - Ref updates decoded from hook input
//! - [`locks`] - Lock records and the per-push lock index
//! - [`objects`] - Tracked large objects and pointer parsing
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Nothing in this module performs I/O except config loading
//! - All decoding is pure and deterministic

pub mod config;
pub mod locks;
pub mod objects;
pub mod refs;
pub mod types;
