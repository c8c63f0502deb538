//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All hook output goes through this module so that quiet and debug modes
//! behave the same across commands.

pub mod output;
