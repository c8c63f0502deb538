//! engine
//!
//! Admission control for a single `git push`.
//!
//! # Architecture
//!
//! Git runs the pre-push hook with the remote name and URL as arguments and
//! one line per ref update on stdin. The engine decides whether the push may
//! proceed:
//!
//! 1. **Snapshot**: Fetch every active lock once and index it by path
//! 2. **Evaluate**: For each ref update, scan the large objects it would
//!    transfer and check their paths against the snapshot
//! 3. **Dispatch**: Hand clean ref updates to the upload pipeline without
//!    waiting for completion
//! 4. **Drain**: At end of input, wait for every upload
//!
//! The first ref update touching a path locked by someone else rejects the
//! whole push. Nothing after it is read or dispatched.
//!
//! # Invariants
//!
//! - The lock registry is queried exactly once per run
//! - Evaluation of a ref update completes before its dispatch
//! - No dispatch happens after a conflict is recorded
//! - Admission is reported only after every upload has drained
//! - Registry failures are fatal, never read as "no locks"
//!
//! # Example
//!
//! ```ignore
//! use lfsgate::engine::{admit_push, PushRequest};
//!
//! let request = PushRequest {
//!     remote: "origin",
//!     validator: &git,
//!     identity: &git,
//!     scanner: &git,
//!     locks: Ok(Arc::new(client)),
//!     uploader,
//!     verbosity,
//! };
//! let outcome = admit_push(request, stdin).await;
//! ```

pub mod collaborators;
pub mod controller;
pub mod dispatch;
pub mod evaluate;
pub mod outcome;
pub mod snapshot;

// Re-exports for convenience
pub use collaborators::{IdentityProvider, ObjectScanner, RemoteValidator, ScanError};
pub use controller::{admit_push, HookController, HookState, PushRequest};
pub use dispatch::{DispatchFailure, UploadDispatcher};
pub use evaluate::LockLedger;
pub use outcome::{HookError, HookOutcome};
pub use snapshot::fetch_lock_index;

use std::path::PathBuf;

/// Execution context shared by all commands.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}
