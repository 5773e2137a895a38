//! Unify command implementation
//!
//! The unify command runs the full pipeline:
//! 1. Discovery of manifest files
//! 2. Loading, target resolution and image rewriting
//! 3. Dependency ordering
//! 4. Composition (plain or replicated)
//! 5. Writing the unified document

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use kondunite::config::{
    default_output, default_repl_base, parse_registries, parse_tag_overrides, OutputMode,
    RunConfig,
};
use kondunite::output::OutputConfig;
use kondunite::phases::orchestrator;

/// Arguments for the unify command
#[derive(Args, Debug)]
pub struct UnifyArgs {
    /// Directory containing the manifests
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Conditional target for unification
    #[arg(short, long, env = "KONDUNITE_TARGET")]
    pub target: String,

    /// Override the tag of an image, e.g. gcr.io/acme/server:1.0 (repeatable)
    #[arg(short = 'i', long = "img", value_name = "NAME:TAG")]
    pub images: Vec<String>,

    /// Replicated base document [default: <DIRECTORY>/replicated_base.yaml]
    #[arg(short = 'b', long, value_name = "PATH")]
    pub repl_base: Option<PathBuf>,

    /// File to write the unified document to [default: <TARGET>.yaml]
    #[arg(short, long, value_name = "PATH", env = "KONDUNITE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Produce a replicated release (base document and images section first)
    #[arg(short, long)]
    pub repl: bool,

    /// Registry from the replicated settings, e.g. gcr.io/acme (repeatable)
    #[arg(long = "repl-registry", value_name = "ENDPOINT/SOURCE")]
    pub repl_registries: Vec<String>,

    /// Only read manifests directly inside DIRECTORY
    #[arg(long)]
    pub no_recurse: bool,

    /// Key allowed to carry a target suffix on a scalar value [default: replicas] (repeatable)
    #[arg(long = "scalar-key", value_name = "KEY")]
    pub scalar_keys: Vec<String>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl UnifyArgs {
    /// Build the run configuration, validating every option.
    pub fn into_config(self) -> Result<RunConfig> {
        let mut config = RunConfig::new(self.directory, self.target)?;

        config.recursive = !self.no_recurse;
        config.tag_overrides = parse_tag_overrides(&self.images)?;
        config.repl_base = self
            .repl_base
            .unwrap_or_else(|| default_repl_base(&config.directory));
        config.output = self
            .output
            .unwrap_or_else(|| default_output(&config.target));
        if !self.scalar_keys.is_empty() {
            config.resolver.scalar_keys = self.scalar_keys;
        }
        if self.repl {
            config.mode = OutputMode::Replicated {
                registries: parse_registries(&self.repl_registries)?,
            };
        }

        Ok(config)
    }
}

/// Execute the unify command
pub fn execute(args: UnifyArgs, output: OutputConfig) -> Result<()> {
    let quiet = args.quiet;
    let config = args.into_config()?;

    if !quiet {
        println!("{}", output.header(&config.target, &config.directory));
    }

    match orchestrator::execute(&config) {
        Ok(report) => {
            if !quiet {
                println!("{}", output.summary(&report, &config.output));
            }
            Ok(())
        }
        Err(e) => {
            if !quiet {
                println!("{}", output.failure());
            }
            Err(e.into())
        }
    }
}
