//! CLI argument definitions using clap
//!
//! Commands:
//! - planlens annotate --plan <path> --statement <path>
//! - planlens compare --plan <path> --alt-plan <path> --statement <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// planlens - annotates a statement with its execution plan and explains
/// why the planner chose it over a forced alternative
#[derive(Parser, Debug)]
#[command(name = "planlens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Annotate a statement against one captured plan
    Annotate {
        /// Path to the plan, as EXPLAIN (FORMAT JSON) output
        #[arg(long)]
        plan: PathBuf,

        /// Path to the parsed statement, as JSON
        #[arg(long)]
        statement: PathBuf,
    },

    /// Annotate against a captured plan and a forced alternative, with
    /// rationales for the positions that differ
    Compare {
        /// Path to the reference plan, as EXPLAIN (FORMAT JSON) output
        #[arg(long)]
        plan: PathBuf,

        /// Path to the plan captured with planner strategies disabled
        #[arg(long)]
        alt_plan: PathBuf,

        /// Path to the parsed statement, as JSON
        #[arg(long)]
        statement: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
