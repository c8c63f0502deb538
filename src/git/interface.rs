//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module is the **single doorway** to the repository. Admission logic
//! sees it only through the collaborator traits in [`crate::engine`]:
//! remote validation, committer identity and the object scanner.
//!
//! # Scanning
//!
//! The scanner walks commits reachable from the pushed revision and not from
//! the remote's revision. When the remote revision is missing (new branch) or
//! unknown locally, everything reachable from `refs/remotes/<remote>/*` is
//! hidden instead. Every added or modified blob small enough to be a pointer
//! is parsed; pointers become [`TrackedObject`]s.
//!
//! # Example
//!
//! ```ignore
//! use lfsgate::git::Git;
//! use lfsgate::core::refs::RefUpdate;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let update = RefUpdate::decode("refs/heads/main abc123... refs/heads/main def456...");
//! for object in git.scan_range("origin", &update)? {
//!     println!("{} {}", object.name, object.path);
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::objects::{Pointer, TrackedObject, MAX_POINTER_SIZE};
use crate::core::refs::RefUpdate;
use crate::core::types::Committer;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Remote is neither configured nor a URL or path.
    #[error("invalid remote name \"{name}\"")]
    InvalidRemote {
        /// The rejected remote
        name: String,
    },

    /// A revision named in hook input does not resolve to a commit.
    #[error("revision not found: {revision}")]
    RevisionNotFound {
        /// The revision that failed to resolve
        revision: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec | git2::ErrorCode::Ambiguous => {
                GitError::RevisionNotFound {
                    revision: context.to_string(),
                }
            }
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// The Git repository interface.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open the repository containing `path`.
    ///
    /// Bare repositories are accepted: pushes can originate from them.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// Path of the `.git` directory.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Directory commands should run in: the work tree, or the git dir if bare.
    pub fn work_dir(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    // =========================================================================
    // Configuration and Identity
    // =========================================================================

    /// Read a string from git configuration.
    pub fn config_string(&self, key: &str) -> Option<String> {
        self.repo
            .config()
            .ok()
            .and_then(|config| config.get_string(key).ok())
            .filter(|value| !value.is_empty())
    }

    /// The identity of the current committer.
    ///
    /// `GIT_COMMITTER_NAME` / `GIT_COMMITTER_EMAIL` override `user.name` /
    /// `user.email`. Missing values are empty strings, which never match a
    /// registry owner.
    pub fn current_committer(&self) -> Committer {
        let pick = |env: &str, key: &str| {
            std::env::var(env)
                .ok()
                .filter(|v| !v.is_empty())
                .or_else(|| self.config_string(key))
                .unwrap_or_default()
        };
        Committer::new(
            pick("GIT_COMMITTER_NAME", "user.name"),
            pick("GIT_COMMITTER_EMAIL", "user.email"),
        )
    }

    // =========================================================================
    // Remote Operations
    // =========================================================================

    /// Whether `name` is a configured remote.
    pub fn has_remote(&self, name: &str) -> bool {
        self.repo.find_remote(name).is_ok()
    }

    /// Get the URL for a remote.
    ///
    /// Returns `None` if the remote doesn't exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) if e.code() == git2::ErrorCode::InvalidSpec => Ok(None),
            Err(e) => Err(GitError::Internal {
                message: e.message().to_string(),
            }),
        }
    }

    /// Check that `name` can be pushed to.
    ///
    /// Valid remotes are configured remote names, URLs, and existing paths.
    ///
    /// # Errors
    ///
    /// - [`GitError::InvalidRemote`] otherwise
    pub fn validate_remote(&self, name: &str) -> Result<(), GitError> {
        if name.is_empty() {
            return Err(GitError::InvalidRemote {
                name: name.to_string(),
            });
        }
        if self.has_remote(name) || looks_like_url(name) || self.work_dir().join(name).exists() {
            return Ok(());
        }
        Err(GitError::InvalidRemote {
            name: name.to_string(),
        })
    }

    /// Resolve the lock registry endpoint for a remote from git configuration.
    ///
    /// Checks `remote.<name>.lfsurl`, then `lfs.url`, then derives one from
    /// the remote's URL (or `fallback_url`, the URL git passed to the hook).
    pub fn lfs_endpoint(&self, remote: &str, fallback_url: Option<&str>) -> Option<String> {
        if let Some(url) = self.config_string(&format!("remote.{}.lfsurl", remote)) {
            return Some(url);
        }
        if let Some(url) = self.config_string("lfs.url") {
            return Some(url);
        }

        let remote_url = self.remote_url(remote).ok().flatten();
        let candidates = [
            remote_url.as_deref(),
            fallback_url,
            looks_like_url(remote).then_some(remote),
        ];
        let endpoint = candidates.into_iter().flatten().find_map(derive_lfs_endpoint);
        endpoint
    }

    // =========================================================================
    // Object Scanning
    // =========================================================================

    /// List the large objects introduced by a ref update.
    ///
    /// Objects are returned in walk order, de-duplicated by (object, path).
    ///
    /// # Errors
    ///
    /// - [`GitError::RevisionNotFound`] if the local revision is unknown
    /// - [`GitError::Internal`] for corrupt or unreadable objects
    pub fn scan_range(
        &self,
        remote: &str,
        update: &RefUpdate,
    ) -> Result<Vec<TrackedObject>, GitError> {
        let local = self
            .repo
            .revparse_single(&update.local_revision)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, &update.local_revision))?;

        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL)?;
        walk.push(local.id())?;

        match self.known_commit(update.excluded_revision()) {
            Some(excluded) => walk.hide(excluded)?,
            None if self.has_remote(remote) => {
                walk.hide_glob(&format!("refs/remotes/{}/*", remote))?
            }
            None => {}
        }

        let odb = self.repo.odb()?;
        let mut seen = HashSet::new();
        let mut objects = Vec::new();

        for oid in walk {
            let commit = self.repo.find_commit(oid?)?;
            let tree = commit.tree()?;
            let parent_tree = match commit.parents().next() {
                Some(parent) => Some(parent.tree()?),
                None => None,
            };

            let diff = self
                .repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

            for delta in diff.deltas() {
                if !matches!(
                    delta.status(),
                    git2::Delta::Added
                        | git2::Delta::Modified
                        | git2::Delta::Renamed
                        | git2::Delta::Copied
                        | git2::Delta::Typechange
                ) {
                    continue;
                }

                let file = delta.new_file();
                let blob_id = file.id();
                // Submodule entries point at commits outside this repository
                if blob_id.is_zero() || file.mode() == git2::FileMode::Commit {
                    continue;
                }
                let Some(path) = file.path().and_then(Path::to_str) else {
                    continue;
                };

                let (size, kind) = odb.read_header(blob_id)?;
                if kind != git2::ObjectType::Blob || size >= MAX_POINTER_SIZE {
                    continue;
                }

                let blob = self.repo.find_blob(blob_id)?;
                if let Some(pointer) = Pointer::from_blob(blob.content()) {
                    let object = TrackedObject::from_pointer(&pointer, path);
                    if seen.insert((object.name.clone(), object.path.clone())) {
                        objects.push(object);
                    }
                }
            }
        }

        Ok(objects)
    }

    /// Parse `sha` and return it if it names a commit present locally.
    fn known_commit(&self, sha: Option<&str>) -> Option<git2::Oid> {
        let oid = git2::Oid::from_str(sha?).ok()?;
        self.repo.find_commit(oid).ok().map(|c| c.id())
    }
}

/// Whether a remote argument is a URL rather than a name.
///
/// Accepts `scheme://...` and scp-like `[user@]host:path`.
pub fn looks_like_url(remote: &str) -> bool {
    if remote.contains("://") {
        return true;
    }
    match remote.split_once(':') {
        // Single letters before ':' are Windows drive letters
        Some((host, path)) => host.len() > 1 && !host.contains('/') && !path.is_empty(),
        None => false,
    }
}

/// Derive the large-file API endpoint from a remote URL.
///
/// `https://host/repo` → `https://host/repo.git/info/lfs`. SSH and scp-like
/// URLs map onto https at the same host. Local paths have no endpoint.
///
/// # Example
///
/// ```
/// use lfsgate::git::derive_lfs_endpoint;
///
/// assert_eq!(
///     derive_lfs_endpoint("git@example.com:team/repo.git").as_deref(),
///     Some("https://example.com/team/repo.git/info/lfs")
/// );
/// ```
pub fn derive_lfs_endpoint(url: &str) -> Option<String> {
    let (base, path) = if url.starts_with("https://") || url.starts_with("http://") {
        let (scheme, rest) = url.split_once("://")?;
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        (format!("{}://{}", scheme, host), path.to_string())
    } else if let Some(rest) = url.strip_prefix("ssh://") {
        let (authority, path) = rest.split_once('/')?;
        let host = authority.rsplit('@').next()?;
        let host = host.split(':').next()?;
        (format!("https://{}", host), path.to_string())
    } else if looks_like_url(url) && !url.contains("://") {
        let (authority, path) = url.split_once(':')?;
        let host = authority.rsplit('@').next()?;
        (format!("https://{}", host), path.to_string())
    } else {
        return None;
    };

    let path = path.trim_matches('/');
    if path.is_empty() {
        return None;
    }
    let path = if path.ends_with(".git") {
        path.to_string()
    } else {
        format!("{}.git", path)
    };
    Some(format!("{}/{}/info/lfs", base, path))
}
