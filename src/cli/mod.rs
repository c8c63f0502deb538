//! cli
//!
//! Command-line interface layer for lfsgate.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Wire concrete collaborators (git, registry, uploader) together
//! - Delegate decisions to the engine and report the outcome
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`], which owns every admission decision.

pub mod args;
pub mod commands;

pub use args::Cli;

use crate::engine;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
