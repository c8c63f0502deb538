//! locks::mock
//!
//! In-memory lock registry for deterministic testing.
//!
//! # Example
//!
//! ```
//! use lfsgate::core::locks::LockRecord;
//! use lfsgate::locks::mock::MockLockClient;
//! use lfsgate::locks::{LockClient, LockFilter};
//!
//! # tokio_test::block_on(async {
//! let client = MockLockClient::with_locks(vec![
//!     LockRecord::new("big.psd", "Alice", "alice@example.com"),
//! ]);
//!
//! let locks = client.search_locks(&LockFilter::default(), 0, true).await.unwrap();
//! assert_eq!(locks.len(), 1);
//! assert_eq!(client.searches().len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::traits::{LockClient, LockError, LockFilter};
use crate::core::locks::LockRecord;

/// Mock lock registry.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockLockClient {
    inner: Arc<Mutex<MockLockInner>>,
}

#[derive(Debug, Default)]
struct MockLockInner {
    /// Active locks.
    locks: Vec<LockRecord>,
    /// Error to return from every search.
    fail_with: Option<LockError>,
    /// Recorded searches for verification.
    searches: Vec<RecordedSearch>,
}

/// A recorded `search_locks` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSearch {
    pub filter: LockFilter,
    pub limit: usize,
    pub include_remote: bool,
}

impl MockLockClient {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the given locks.
    pub fn with_locks(locks: Vec<LockRecord>) -> Self {
        let client = Self::new();
        client.inner.lock().unwrap().locks = locks;
        client
    }

    /// Make every search fail with `error`.
    pub fn fail_with(self, error: LockError) -> Self {
        self.inner.lock().unwrap().fail_with = Some(error);
        self
    }

    /// All recorded searches.
    pub fn searches(&self) -> Vec<RecordedSearch> {
        self.inner.lock().unwrap().searches.clone()
    }
}

#[async_trait]
impl LockClient for MockLockClient {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search_locks(
        &self,
        filter: &LockFilter,
        limit: usize,
        include_remote: bool,
    ) -> Result<Vec<LockRecord>, LockError> {
        let mut inner = self.inner.lock().unwrap();
        inner.searches.push(RecordedSearch {
            filter: filter.clone(),
            limit,
            include_remote,
        });

        if let Some(err) = &inner.fail_with {
            return Err(err.clone());
        }

        let matching = inner.locks.iter().filter(|l| filter.matches(l)).cloned();
        Ok(if limit > 0 {
            matching.take(limit).collect()
        } else {
            matching.collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> MockLockClient {
        MockLockClient::with_locks(vec![
            LockRecord::new("a.bin", "Alice", "alice@example.com"),
            LockRecord::new("b.bin", "Bob", "bob@example.com"),
        ])
    }

    #[tokio::test]
    async fn returns_all_without_filter() {
        let locks = registry()
            .search_locks(&LockFilter::default(), 0, true)
            .await
            .unwrap();
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn honors_limit_and_filter() {
        let client = registry();
        assert_eq!(
            client
                .search_locks(&LockFilter::default(), 1, true)
                .await
                .unwrap()
                .len(),
            1
        );

        let filter = LockFilter {
            path: Some("b.bin".into()),
            id: None,
        };
        let locks = client.search_locks(&filter, 0, true).await.unwrap();
        assert_eq!(locks[0].owner_name, "Bob");
    }

    #[tokio::test]
    async fn configured_failure() {
        let client = registry().fail_with(LockError::RateLimited);
        let err = client
            .search_locks(&LockFilter::default(), 0, true)
            .await
            .unwrap_err();
        assert_eq!(err, LockError::RateLimited);
        assert_eq!(client.searches().len(), 1);
    }
}
