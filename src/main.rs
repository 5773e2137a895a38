//! # kondunite CLI
//!
//! This is the binary entry point for the `kondunite` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and terminal output.
//! - Executing the selected command and reporting failures.
//!
//! The unification logic lives in the `kondunite` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
