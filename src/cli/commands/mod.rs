//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the repository and loads configuration
//! 2. Builds the lock registry client and uploader
//! 3. Calls the engine and formats its result
//!
//! # Async Commands
//!
//! Both commands talk to the lock registry over the network. Handlers create
//! a tokio runtime and `block_on` their async implementation.

mod locks;
mod pre_push;

// Re-export command functions for testing and direct invocation
pub use locks::locks;
pub use pre_push::pre_push;

use crate::cli::args::Command;
use crate::core::config::Config;
use crate::engine::{Context, HookError};
use crate::git::Git;
use crate::locks::HttpLockClient;
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::PrePush {
            remote,
            url,
            dry_run,
        } => pre_push::pre_push(ctx, remote.as_deref(), url.as_deref(), dry_run),
        Command::Locks { remote } => locks::locks(ctx, &remote),
    }
}

/// Repository, configuration and verbosity for one command.
struct Session {
    git: Git,
    config: Config,
    verbosity: Verbosity,
}

impl Session {
    /// Open the repository at the context's working directory and load config.
    fn open(ctx: &Context) -> Result<Self> {
        let cwd = match &ctx.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir().context("cannot determine working directory")?,
        };
        let git = Git::open(&cwd)?;
        let loaded = Config::load(Some(git.git_dir()))?;

        let verbosity = Verbosity::from_env(ctx.quiet, ctx.debug || loaded.config.trace());
        for source in &loaded.sources {
            output::debug(format!("config: {}", source.display()), verbosity);
        }

        Ok(Self {
            git,
            config: loaded.config,
            verbosity,
        })
    }

    /// Build the lock registry client for `remote`.
    ///
    /// `url` is the push URL git handed the hook, used when `remote` is
    /// not a configured remote.
    fn lock_client(&self, remote: &str, url: Option<&str>) -> Result<HttpLockClient, HookError> {
        let endpoint = match self.config.locks_url() {
            Some(url) => url.to_string(),
            None => self.git.lfs_endpoint(remote, url).ok_or_else(|| {
                HookError::LockSystem(format!("no lock registry endpoint for remote \"{}\"", remote))
            })?,
        };
        output::debug(format!("lock registry: {}", endpoint), self.verbosity);

        let token = std::env::var(self.config.token_env())
            .ok()
            .filter(|t| !t.is_empty());
        Ok(HttpLockClient::new(endpoint, token))
    }
}
