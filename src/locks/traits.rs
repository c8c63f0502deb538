//! locks::traits
//!
//! Lock registry client trait definition.
//!
//! # Design
//!
//! The `LockClient` trait is async because registry queries involve network
//! I/O. A failed query is always an error; callers must never read an error
//! as "no locks", since that would let a conflicting push through.
//!
//! # Example
//!
//! ```ignore
//! use lfsgate::locks::{LockClient, LockFilter};
//!
//! async fn show(client: &dyn LockClient) -> Result<(), LockError> {
//!     for lock in client.search_locks(&LockFilter::default(), 0, true).await? {
//!         println!("{} locked by {}", lock.path, lock.owner_name);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::locks::LockRecord;

/// Errors from lock registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LockError {
    /// Authentication failed (missing, invalid or expired credentials).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The registry endpoint does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// Registry returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the registry
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The registry paged its answer; the lock list is partial.
    #[error("lock registry returned a partial lock list (next cursor {0:?})")]
    IncompleteSnapshot(String),

    /// A local-only search was requested but no local lock cache is kept.
    #[error("no local lock cache; the registry must be queried")]
    LocalCacheUnavailable,
}

/// Narrowing criteria for a lock search.
///
/// The default filter matches every active lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockFilter {
    /// Only locks on this path
    pub path: Option<String>,
    /// Only the lock with this id
    pub id: Option<String>,
}

impl LockFilter {
    /// Whether the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.id.is_none()
    }

    /// Whether a lock satisfies this filter.
    pub fn matches(&self, lock: &LockRecord) -> bool {
        self.path.as_deref().map_or(true, |p| p == lock.path)
            && self.id.as_deref().map_or(true, |id| id == lock.id)
    }
}

/// Client for the remote lock registry.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
/// Releasing connections happens on drop.
#[async_trait]
pub trait LockClient: Send + Sync {
    /// Registry kind (e.g., "http", "mock").
    fn name(&self) -> &'static str;

    /// Search active locks.
    ///
    /// # Arguments
    ///
    /// * `filter` - Narrowing criteria; the default matches all locks
    /// * `limit` - Maximum number of locks to return; `0` means no limit
    /// * `include_remote` - Query the registry itself rather than a local cache
    ///
    /// # Errors
    ///
    /// Any failure to reach or understand the registry.
    async fn search_locks(
        &self,
        filter: &LockFilter,
        limit: usize,
        include_remote: bool,
    ) -> Result<Vec<LockRecord>, LockError>;
}
