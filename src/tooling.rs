//! Tooling & Integration Layer
//!
//! The `townctl` command line: argument parsing, command dispatch and output
//! formatting.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
