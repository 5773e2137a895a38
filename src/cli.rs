//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use kondunite::output::OutputConfig;

/// kondunite - Unify conditional Kubernetes manifests for one target
#[derive(Parser, Debug)]
#[command(name = "kondunite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace", "off"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Unify a manifest directory into a single document for one target
    Unify(commands::unify::UnifyArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // RUST_LOG takes precedence over --log-level when set
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .format_timestamp(None)
        .format_target(false)
        .try_init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Unify(args) => commands::unify::execute(args, output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
