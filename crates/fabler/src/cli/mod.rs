//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the fabler binary.

mod check;
mod commands;
mod run;

pub use check::check_script;
pub use commands::{Cli, Commands};
pub use run::{RunOptions, run_session};
