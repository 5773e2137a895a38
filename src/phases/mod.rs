//! Implementation of the phases of a unification run.
//!
//! ## Overview
//!
//! A run follows 5 phases:
//! 1. Discovery - Find manifest files under the manifest directory
//! 2. Loading - Split files into documents, filter and resolve them for the target
//! 3. Ordering - Flatten the file dependency graph into an emission order
//! 4. Composition - Concatenate fragments in order, optionally in replicated layout
//! 5. Writing - Write the unified document to the output path
//!
//! All state accumulated across files lives in a [`RunContext`] that is
//! threaded through the phases; nothing is kept between runs.

use std::collections::{BTreeMap, BTreeSet};

use crate::images::ImageRef;

// Phase modules
pub mod compose;
pub mod discovery;
pub mod loading;
pub mod orchestrator;
pub mod ordering;
pub mod write;

pub use compose as phase4;
pub use discovery as phase1;
pub use loading as phase2;
pub use ordering as phase3;
pub use write as phase5;

/// Kind annotation used when a document declares no `replKind`.
pub const DEFAULT_REPL_KIND: &str = "scheduler-kubernetes";

/// File name to the file names it depends on.
pub type DependencyGraph = BTreeMap<String, BTreeSet<String>>;

/// State accumulated over every file of one run.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Dependency edges, with an entry for every discovered file
    pub dependencies: DependencyGraph,
    /// Serialized documents per file, in document order
    pub fragments: BTreeMap<String, Vec<String>>,
    /// Every image referenced by a surviving document
    pub images: BTreeSet<ImageRef>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `file` takes part in ordering even without edges.
    pub fn register_file(&mut self, file: &str) {
        self.dependencies.entry(file.to_string()).or_default();
    }

    pub fn add_dependency(&mut self, file: &str, depends_on: &str) {
        self.dependencies
            .entry(file.to_string())
            .or_default()
            .insert(depends_on.to_string());
    }

    pub fn add_fragment(&mut self, file: &str, fragment: String) {
        self.fragments
            .entry(file.to_string())
            .or_default()
            .push(fragment);
    }
}

/// Emission order of manifest files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOrder {
    /// File names, each after all of its dependencies
    pub order: Vec<String>,
}

impl FileOrder {
    pub fn new(order: Vec<String>) -> Self {
        Self { order }
    }
}
