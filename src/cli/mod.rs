//! CLI module for docgate
//!
//! Provides the command-line interface:
//! - serve: boot the gateway and enter the serving loop
//! - check-config: validate configuration and exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::run;
pub use errors::{CliError, CliResult};
