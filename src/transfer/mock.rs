//! transfer::mock
//!
//! Recording uploader for deterministic testing.
//!
//! # Example
//!
//! ```
//! use lfsgate::core::objects::TrackedObject;
//! use lfsgate::transfer::mock::MockUploader;
//! use lfsgate::transfer::Uploader;
//!
//! # tokio_test::block_on(async {
//! let uploader = MockUploader::new().fail_on("bad");
//! let good = TrackedObject { name: "good".into(), path: "a.bin".into(), size: 1 };
//! let bad = TrackedObject { name: "bad".into(), path: "b.bin".into(), size: 1 };
//!
//! assert!(uploader.upload("origin", &good).await.is_ok());
//! assert!(uploader.upload("origin", &bad).await.is_err());
//! assert_eq!(uploader.uploaded(), vec![good]);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::traits::{TransferError, Uploader};
use crate::core::objects::TrackedObject;

/// Mock uploader.
///
/// Clones share state, so a test can keep a handle while the dispatcher owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MockUploader {
    inner: Arc<Mutex<MockUploaderInner>>,
}

#[derive(Debug, Default)]
struct MockUploaderInner {
    /// Object names whose upload fails.
    fail_on: HashSet<String>,
    /// Successfully uploaded objects, in completion order.
    uploaded: Vec<TrackedObject>,
    /// Every attempted (remote, object name).
    attempts: Vec<(String, String)>,
}

impl MockUploader {
    /// Create an uploader that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make uploads of the named object fail.
    pub fn fail_on(self, name: impl Into<String>) -> Self {
        self.inner.lock().unwrap().fail_on.insert(name.into());
        self
    }

    /// Objects uploaded successfully.
    pub fn uploaded(&self) -> Vec<TrackedObject> {
        self.inner.lock().unwrap().uploaded.clone()
    }

    /// Every attempt as (remote, object name).
    pub fn attempts(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().attempts.clone()
    }
}

#[async_trait]
impl Uploader for MockUploader {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn upload(&self, remote: &str, object: &TrackedObject) -> Result<(), TransferError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .attempts
            .push((remote.to_string(), object.name.clone()));

        if inner.fail_on.contains(&object.name) {
            return Err(TransferError::Rejected(format!(
                "mock refused {}",
                object.name
            )));
        }

        inner.uploaded.push(object.clone());
        Ok(())
    }
}
