//! locks
//!
//! Abstraction over the remote lock registry.
//!
//! # Architecture
//!
//! The [`LockClient`] trait is the seam between admission logic and the
//! registry. Production uses [`HttpLockClient`]; tests use
//! [`mock::MockLockClient`].
//!
//! # Invariants
//!
//! - Admission queries the registry exactly once per hook run
//! - A registry failure is never interpreted as "no locks"

pub mod http;
pub mod mock;
mod traits;

pub use http::HttpLockClient;
pub use traits::{LockClient, LockError, LockFilter};
