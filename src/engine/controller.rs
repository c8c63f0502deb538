//! engine::controller
//!
//! The pre-push admission state machine.
//!
//! # Lifecycle
//!
//! ```text
//! Reading -> Deciding -> Skipping                -> Reading
//!                     -> Evaluating -> Dispatching -> Reading
//!                                   -> Aborting   (terminal)
//! input exhausted -> Draining -> Done | Failed    (terminal)
//! ```
//!
//! # Invariants
//!
//! - The lock index is fixed before the first line is read
//! - Nothing is dispatched for a ref update until its objects are evaluated
//! - Once any conflict is recorded, no further line is read and nothing more
//!   is dispatched; uploads already dispatched are left running
//! - Success is only reported after every dispatched upload has drained

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::collaborators::{IdentityProvider, ObjectScanner, RemoteValidator};
use super::dispatch::UploadDispatcher;
use super::evaluate::LockLedger;
use super::outcome::{HookError, HookOutcome};
use super::snapshot::fetch_lock_index;
use crate::core::locks::LockIndex;
use crate::core::refs::RefUpdate;
use crate::core::types::Committer;
use crate::locks::LockClient;
use crate::transfer::Uploader;
use crate::ui::output::{self, Verbosity};

/// Controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    /// Waiting for the next input line
    Reading,
    /// Deciding what a line requires
    Deciding,
    /// A blank line or branch deletion; nothing to do
    Skipping,
    /// Checking a ref update's objects against the lock index
    Evaluating,
    /// Handing a clean ref update to the dispatcher
    Dispatching,
    /// A conflict was found; the run is over
    Aborting,
    /// Input exhausted; waiting for uploads
    Draining,
    /// All uploads finished
    Done,
    /// The run failed
    Failed,
}

/// What one input line led to.
enum Step {
    Continue,
    Reject(RefUpdate),
}

/// Drives one hook run over a fixed lock snapshot.
pub struct HookController<'a> {
    remote: String,
    committer: Committer,
    index: LockIndex,
    scanner: &'a dyn ObjectScanner,
    dispatcher: UploadDispatcher,
    ledger: LockLedger,
    state: HookState,
    verbosity: Verbosity,
}

impl<'a> HookController<'a> {
    /// Create a controller for a push to `remote`.
    pub fn new(
        remote: &str,
        committer: Committer,
        index: LockIndex,
        scanner: &'a dyn ObjectScanner,
        uploader: Arc<dyn Uploader>,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            remote: remote.to_string(),
            committer,
            index,
            scanner,
            dispatcher: UploadDispatcher::new(uploader, remote, verbosity),
            ledger: LockLedger::new(),
            state: HookState::Reading,
            verbosity,
        }
    }

    /// Current state.
    pub fn state(&self) -> HookState {
        self.state
    }

    fn enter(&mut self, state: HookState) {
        self.state = state;
    }

    /// Consume hook input to completion and decide the push.
    pub async fn run<R>(mut self, input: R) -> HookOutcome
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        loop {
            self.enter(HookState::Reading);
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => return self.fail(HookError::Input(e)),
            };

            match self.process_line(&line) {
                Ok(Step::Continue) => {}
                Ok(Step::Reject(update)) => return self.reject(update),
                Err(e) => return self.fail(e),
            }
        }

        self.drain().await
    }

    /// Handle one input line.
    fn process_line(&mut self, line: &str) -> Result<Step, HookError> {
        self.enter(HookState::Deciding);
        let line = line.trim();
        if line.is_empty() {
            self.enter(HookState::Skipping);
            return Ok(Step::Continue);
        }

        output::debug(format!("pre-push: {}", line), self.verbosity);

        let update = RefUpdate::decode(line);
        if update.is_empty() || update.is_deletion() {
            self.enter(HookState::Skipping);
            return Ok(Step::Continue);
        }

        self.enter(HookState::Evaluating);
        let objects = self
            .scanner
            .scan(&self.remote, &update)
            .map_err(|e| HookError::Scan {
                revision: e.revision,
                message: e.message,
            })?;
        output::debug(
            format!("{}: {} large object(s)", update.local_revision, objects.len()),
            self.verbosity,
        );

        self.ledger.evaluate(&self.index, &self.committer, &objects);
        if self.ledger.has_conflicts() {
            self.enter(HookState::Aborting);
            return Ok(Step::Reject(update));
        }

        self.enter(HookState::Dispatching);
        self.dispatcher.enqueue(&update, objects);
        Ok(Step::Continue)
    }

    fn reject(self, update: RefUpdate) -> HookOutcome {
        let (conflicts, _) = self.ledger.into_parts();
        self.dispatcher.detach();
        HookOutcome::Rejected {
            local_revision: update.local_revision,
            remote: self.remote,
            conflicts,
        }
    }

    fn fail(mut self, err: HookError) -> HookOutcome {
        self.enter(HookState::Failed);
        self.dispatcher.detach();
        HookOutcome::Failed(err)
    }

    async fn drain(mut self) -> HookOutcome {
        self.enter(HookState::Draining);
        let dispatched = self.dispatcher.enqueued();
        output::debug(
            format!(
                "draining {} upload(s) from {} ref update(s)",
                self.dispatcher.outstanding(),
                dispatched
            ),
            self.verbosity,
        );

        match self.dispatcher.await_all().await {
            Ok(uploaded) => {
                self.state = HookState::Done;
                let (_, owned_locks) = self.ledger.into_parts();
                HookOutcome::Admitted {
                    owned_locks,
                    dispatched,
                    uploaded,
                }
            }
            Err(failures) => {
                self.state = HookState::Failed;
                HookOutcome::Failed(HookError::Upload(failures))
            }
        }
    }
}

/// Everything one pre-push run needs.
pub struct PushRequest<'a> {
    /// Remote named on the hook command line
    pub remote: &'a str,
    /// Validates `remote`
    pub validator: &'a dyn RemoteValidator,
    /// Supplies the committer identity
    pub identity: &'a dyn IdentityProvider,
    /// Lists the objects of each ref update
    pub scanner: &'a dyn ObjectScanner,
    /// Lock registry, or the reason none could be set up
    pub locks: Result<Arc<dyn LockClient>, HookError>,
    /// Upload pipeline
    pub uploader: Arc<dyn Uploader>,
    /// Diagnostic verbosity
    pub verbosity: Verbosity,
}

/// Run the whole admission decision for one push.
///
/// Validates the remote, takes the lock snapshot, then drives a
/// [`HookController`] over `input`. An unusable remote is reported before a
/// missing lock registry.
///
/// # Example
///
/// ```ignore
/// let outcome = admit_push(request, tokio::io::BufReader::new(tokio::io::stdin())).await;
/// std::process::exit(outcome.exit_code());
/// ```
pub async fn admit_push<R>(request: PushRequest<'_>, input: R) -> HookOutcome
where
    R: AsyncBufRead + Unpin,
{
    if request.remote.is_empty() {
        return HookError::MissingRemote.into();
    }
    if request.validator.validate_remote(request.remote).is_err() {
        return HookError::InvalidRemote(request.remote.to_string()).into();
    }

    let locks = match request.locks {
        Ok(locks) => locks,
        Err(e) => return e.into(),
    };
    let index = match fetch_lock_index(&*locks, request.verbosity).await {
        Ok(index) => index,
        Err(e) => return e.into(),
    };
    let committer = request.identity.current_committer();
    output::debug(format!("committer: {}", committer), request.verbosity);

    HookController::new(
        request.remote,
        committer,
        index,
        request.scanner,
        request.uploader,
        request.verbosity,
    )
    .run(input)
    .await
}
