//! CLI module for planlens
//!
//! Provides the command-line interface:
//! - annotate: annotate a statement against one captured plan
//! - compare: annotate against a captured plan and a forced alternative

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{annotate, compare, run_command};
pub use errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}
