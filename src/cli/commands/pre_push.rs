//! cli::commands::pre_push
//!
//! Git pre-push hook entry point.
//!
//! # Design
//!
//! Git invokes the hook as `pre-push <remote> <url>` and writes one ref
//! update per line to stdin. This handler builds the real collaborators
//! (repository scanner, HTTP lock registry, `git lfs push` uploader) and
//! hands them to [`admit_push`]. The push is refused (exit 1) on:
//!
//! - a missing or invalid remote
//! - a lock registry failure
//! - any path locked by another user
//! - any failed upload
//!
//! # Example
//!
//! ```bash
//! # .git/hooks/pre-push
//! exec lfsgate pre-push "$@"
//!
//! # Preview uploads without sending anything
//! lfsgate pre-push --dry-run origin < refs.txt
//! ```

use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::io::BufReader;

use super::Session;
use crate::engine::{admit_push, Context, DispatchFailure, HookError, HookOutcome, PushRequest};
use crate::locks::LockClient;
use crate::transfer::{DryRunUploader, GitLfsUploader, Uploader};
use crate::ui::output::{self, Verbosity};

/// Run the pre-push command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn pre_push(ctx: &Context, remote: Option<&str>, url: Option<&str>, dry_run: bool) -> Result<()> {
    let remote = match remote {
        Some(remote) if !remote.is_empty() => remote,
        _ => bail!(HookError::MissingRemote),
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(pre_push_async(ctx, remote, url, dry_run))
}

/// Async implementation of pre-push.
async fn pre_push_async(ctx: &Context, remote: &str, url: Option<&str>, dry_run: bool) -> Result<()> {
    let session = Session::open(ctx)?;
    let verbosity = session.verbosity;

    // Reported by the engine once the remote has been validated
    let locks = session
        .lock_client(remote, url)
        .map(|client| Arc::new(client) as Arc<dyn LockClient>);

    let uploader: Arc<dyn Uploader> = if dry_run {
        Arc::new(DryRunUploader::new(verbosity))
    } else {
        Arc::new(GitLfsUploader::new(
            session.config.transfer_program(),
            session.git.work_dir(),
            session.config.transfer_concurrency(),
        ))
    };
    output::debug(
        format!(
            "uploader: {} ({} at a time)",
            uploader.name(),
            session.config.transfer_concurrency()
        ),
        verbosity,
    );

    let request = PushRequest {
        remote,
        validator: &session.git,
        identity: &session.git,
        scanner: &session.git,
        locks,
        uploader,
        verbosity,
    };
    let stdin = BufReader::new(tokio::io::stdin());

    report(admit_push(request, stdin).await, verbosity)
}

/// Print the outcome of a hook run and map it to a result.
fn report(outcome: HookOutcome, verbosity: Verbosity) -> Result<()> {
    match outcome {
        HookOutcome::Admitted {
            owned_locks,
            dispatched,
            uploaded,
        } => {
            if !owned_locks.is_empty() {
                output::print("Pushing your locked files:", verbosity);
                output::print(output::format_list(&owned_locks, "* "), verbosity);
            }
            output::debug(
                format!("admitted: {} ref update(s), {} object(s) uploaded", dispatched, uploaded),
                verbosity,
            );
            Ok(())
        }
        HookOutcome::Rejected {
            local_revision,
            remote,
            conflicts,
        } => {
            output::alert(format!("Some files are locked in {}...{}", local_revision, remote));
            output::alert(output::format_list(&conflicts, "* "));
            bail!("push rejected: {} locked file(s)", conflicts.len())
        }
        HookOutcome::Failed(HookError::Upload(failures)) => {
            for failure in &failures {
                output::alert(describe_failure(failure));
            }
            bail!(HookError::Upload(failures))
        }
        HookOutcome::Failed(err) => Err(err.into()),
    }
}

fn describe_failure(failure: &DispatchFailure) -> String {
    format!("  {}", failure)
}
