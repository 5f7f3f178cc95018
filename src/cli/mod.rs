//! Command-line interface for pymend.
//!
//! Provides the built-in demo and the file repair command.

mod commands;

pub use commands::{parse_cli, run, run_with_cli};
