//! core::refs
//!
//! Decoding of pre-push hook input lines.
//!
//! Git feeds the pre-push hook one line per ref being pushed:
//!
//! ```text
//! <local-ref> <local-sha> <remote-ref> <remote-sha>
//! ```
//!
//! Only the two revisions matter for admission. The remote revision is
//! carried in its exclusion form (`^<sha>`) because the scanner walks
//! "reachable from local, not reachable from remote".

use crate::core::types::Oid;

/// Marker prefixed to the remote revision to express range exclusion.
pub const EXCLUDE_PREFIX: char = '^';

/// One decoded ref update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefUpdate {
    /// Revision being pushed. Empty when the line was malformed.
    pub local_revision: String,
    /// Remote revision in exclusion form (`^<sha>`), if the line had one.
    pub remote_revision: Option<String>,
}

impl RefUpdate {
    /// Decode one hook input line.
    ///
    /// Lines with fewer than two tokens produce an empty local revision,
    /// which callers treat as "nothing to do".
    ///
    /// # Example
    ///
    /// ```
    /// use lfsgate::core::refs::RefUpdate;
    ///
    /// let update = RefUpdate::decode("refs/heads/main abc123 refs/heads/main def456");
    /// assert_eq!(update.local_revision, "abc123");
    /// assert_eq!(update.remote_revision.as_deref(), Some("^def456"));
    /// ```
    pub fn decode(line: &str) -> Self {
        let tokens: Vec<&str> = line.trim().split(' ').collect();

        let local_revision = tokens.get(1).map(|s| s.to_string()).unwrap_or_default();
        let remote_revision = tokens
            .get(3)
            .map(|sha| format!("{}{}", EXCLUDE_PREFIX, sha));

        Self {
            local_revision,
            remote_revision,
        }
    }

    /// Whether there is nothing to push for this update.
    pub fn is_empty(&self) -> bool {
        self.local_revision.is_empty()
    }

    /// Whether this update deletes the remote ref.
    pub fn is_deletion(&self) -> bool {
        self.local_revision == Oid::NULL_SHA1
    }

    /// The remote revision without its exclusion marker.
    ///
    /// Returns `None` when absent or when the remote side is the null
    /// revision (the ref is being created).
    pub fn excluded_revision(&self) -> Option<&str> {
        let sha = self
            .remote_revision
            .as_deref()?
            .trim_start_matches(EXCLUDE_PREFIX);
        if sha.is_empty() || sha == Oid::NULL_SHA1 {
            None
        } else {
            Some(sha)
        }
    }
}

impl std::fmt::Display for RefUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.remote_revision {
            Some(remote) => write!(f, "{} {}", self.local_revision, remote),
            None => write!(f, "{}", self.local_revision),
        }
    }
}
