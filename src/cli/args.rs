//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lfsgate - Pre-push admission gate for large-file locks
#[derive(Parser, Debug)]
#[command(name = "lfsgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if lfsgate was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a push against active locks and upload its large objects
    #[command(
        name = "pre-push",
        long_about = "Check a push against active locks and upload its large objects.\n\n\
            Run from Git's pre-push hook. Reads one ref update per line from stdin \
            (\"<local ref> <local sha> <remote ref> <remote sha>\"), checks every large \
            file the push would send against the lock registry, and rejects the whole \
            push if any of them is locked by someone else. Otherwise the large objects \
            are uploaded before Git continues.",
        after_help = "\
HOOK SETUP:
    # .git/hooks/pre-push
    #!/bin/sh
    exec lfsgate pre-push \"$@\"

EXAMPLES:
    # What would be uploaded, without uploading
    echo \"refs/heads/main $(git rev-parse HEAD) refs/heads/main 0000000000000000000000000000000000000000\" \\
        | lfsgate pre-push --dry-run origin"
    )]
    PrePush {
        /// Remote being pushed to (name or URL)
        remote: Option<String>,

        /// URL git is pushing to
        url: Option<String>,

        /// List the objects that would be uploaded instead of uploading them
        #[arg(short = 'd', long)]
        dry_run: bool,
    },

    /// List active locks on a remote's lock registry
    Locks {
        /// Remote whose registry to query
        #[arg(default_value = "origin")]
        remote: String,
    },
}
