//! engine::snapshot
//!
//! One-shot lock registry snapshot.
//!
//! # Invariants
//!
//! - Exactly one registry query per hook run: no filter, no limit
//! - A failed query ends the run; it is never treated as "no locks"

use super::outcome::HookError;
use crate::core::locks::LockIndex;
use crate::locks::{LockClient, LockFilter};
use crate::ui::output::{self, Verbosity};

/// Fetch every active lock and index it by path.
///
/// # Errors
///
/// - [`HookError::Registry`] if the registry query fails
/// - [`HookError::DuplicateLock`] if two locks share a path
pub async fn fetch_lock_index(
    client: &dyn LockClient,
    verbosity: Verbosity,
) -> Result<LockIndex, HookError> {
    let locks = client
        .search_locks(&LockFilter::default(), 0, true)
        .await?;

    output::debug(
        format!("lock snapshot from {}: {} active", client.name(), locks.len()),
        verbosity,
    );

    Ok(LockIndex::build(locks)?)
}
