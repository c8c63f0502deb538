//! cli::commands::locks
//!
//! List the active locks a push would be checked against.
//!
//! Uses the same single snapshot as the pre-push hook, so the listing is
//! exactly what admission sees. Locks held by the current committer are
//! marked.

use anyhow::{bail, Result};

use super::Session;
use crate::core::locks::{LockIndex, LockRecord};
use crate::core::types::Committer;
use crate::engine::{fetch_lock_index, Context, HookError};
use crate::ui::output::{self, Verbosity};

/// Run the locks command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn locks(ctx: &Context, remote: &str) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(locks_async(ctx, remote))
}

/// Async implementation of locks.
async fn locks_async(ctx: &Context, remote: &str) -> Result<()> {
    let session = Session::open(ctx)?;
    let verbosity = session.verbosity;

    if session.git.validate_remote(remote).is_err() {
        bail!(HookError::InvalidRemote(remote.to_string()));
    }

    let client = session.lock_client(remote, None)?;
    let index = fetch_lock_index(&client, verbosity).await?;
    let committer = session.git.current_committer();

    print_locks(&index, &committer, verbosity);
    Ok(())
}

fn print_locks(index: &LockIndex, committer: &Committer, verbosity: Verbosity) {
    if index.is_empty() {
        output::print("No active locks.", verbosity);
        return;
    }
    for lock in index.sorted() {
        output::print(format_lock(lock, committer), verbosity);
    }
}

/// One listing line: `<path>\t<owner name> <owner email>`, suffixed with
/// `(yours)` when the committer holds the lock.
fn format_lock(lock: &LockRecord, committer: &Committer) -> String {
    let line = format!("{}\t{} <{}>", lock.path, lock.owner_name, lock.owner_email);
    if lock.is_owned_by(committer) {
        format!("{}\t(yours)", line)
    } else {
        line
    }
}
