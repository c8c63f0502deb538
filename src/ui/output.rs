//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Hook diagnostics are plain text. Informational lines go to stdout and
//! respect quiet mode; errors and lock conflicts go to stderr and are always
//! shown. Debug lines are enabled by `--debug` or by a truthy `GIT_TRACE` /
//! `LFSGATE_TRACE`, so tracing a push with git's own switch also traces us.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    /// Create verbosity from flags, letting trace environment variables enable debug.
    pub fn from_env(quiet: bool, debug: bool) -> Self {
        let traced = ["LFSGATE_TRACE", "GIT_TRACE"]
            .iter()
            .any(|var| std::env::var(var).map_or(false, |v| is_truthy(&v)));
        Self::from_flags(quiet, debug || traced)
    }
}

/// Whether an environment value switches tracing on.
///
/// Git accepts `1`, `2`, `true` or an absolute path for `GIT_TRACE`.
fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print an unprefixed line to stderr (always shown).
pub fn alert(message: impl Display) {
    eprintln!("{}", message);
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins_over_debug() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn trace_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("/tmp/trace.log"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn list_formatting() {
        assert_eq!(format_list(&["a.bin", "b.bin"], "* "), "* a.bin\n* b.bin");
        assert_eq!(format_list::<&str>(&[], "* "), "");
    }
}
