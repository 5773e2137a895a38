//! Orchestrator for a complete unification run
//!
//! This module coordinates all phases behind a single call. The document is
//! fully composed before anything is written, so a failing run (for example
//! a dependency cycle) leaves no output file behind.

use std::fs;
use std::path::Path;

use log::debug;

use super::compose::Layout;
use super::{phase1, phase2, phase3, phase4, phase5, RunContext};
use crate::config::{OutputMode, RunConfig};
use crate::error::{Error, Result};

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The unified document
    pub document: String,
    /// Number of manifest files discovered
    pub files: usize,
    /// Number of documents emitted
    pub documents: usize,
    /// Number of distinct images referenced
    pub images: usize,
}

/// Run Phases 1-4 and return the unified document without writing it.
pub fn unify(config: &RunConfig) -> Result<RunReport> {
    // Phase 1: Discovery
    let excluded = [config.repl_base.as_path(), config.output.as_path()];
    let manifests = phase1::execute(&config.directory, config.recursive, &excluded)?;

    // Phase 2: Loading
    let mut context = RunContext::new();
    phase2::execute(&manifests, config, &mut context)?;
    debug!("Dependency graph: {:?}", context.dependencies);

    // Phase 3: Ordering
    let order = phase3::execute(&context.dependencies)?;

    // Phase 4: Composition
    let document = match &config.mode {
        OutputMode::Plain => phase4::execute(&order, &context, Layout::Plain),
        OutputMode::Replicated { registries } => {
            let base = read_repl_base(&config.repl_base)?;
            phase4::execute(
                &order,
                &context,
                Layout::Replicated {
                    base: &base,
                    registries,
                },
            )
        }
    };

    Ok(RunReport {
        document,
        files: manifests.len(),
        documents: context.fragments.values().map(Vec::len).sum(),
        images: context.images.len(),
    })
}

/// Execute the complete run (Phases 1-5)
pub fn execute(config: &RunConfig) -> Result<RunReport> {
    let report = unify(config)?;

    // Phase 5: Write to Disk
    phase5::execute(&report.document, &config.output)?;

    Ok(report)
}

fn read_repl_base(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to read replicated base '{}': {}", path.display(), e),
    })
}
