//! # Run Configuration
//!
//! This module turns the raw option strings a caller supplies into the typed
//! configuration one unification run works from.
//!
//! ## Option formats
//!
//! - **Tag overrides** are written `name:tag`, split at the first `:`, e.g.
//!   `gcr.io/acme/server:1.0` overrides the tag of `gcr.io/acme/server`.
//! - **Registries** are written `endpoint/source`, split at the first `/`,
//!   e.g. `gcr.io/acme` is endpoint `gcr.io` with source `acme`.
//!
//! Malformed values are rejected with [`Error::Config`] before any manifest
//! is read.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::images::{Registry, TagOverrides};
use crate::target::ResolverOptions;

/// File name of the replicated base looked up inside the manifest directory.
pub const DEFAULT_REPL_BASE: &str = "replicated_base.yaml";

/// How the unified document is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Manifests only.
    Plain,
    /// Replicated base, generated `images:` section, then manifests.
    Replicated { registries: Vec<Registry> },
}

/// Everything one unification run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory searched for manifests
    pub directory: PathBuf,
    /// Whether to descend into subdirectories
    pub recursive: bool,
    /// Conditional target to unify for
    pub target: String,
    /// Replacement tags keyed by image name
    pub tag_overrides: TagOverrides,
    /// Replicated base document, never treated as a manifest
    pub repl_base: PathBuf,
    /// Where the unified document is written
    pub output: PathBuf,
    /// Output layout
    pub mode: OutputMode,
    /// Target resolution options
    pub resolver: ResolverOptions,
}

impl RunConfig {
    /// Create a plain-mode configuration with the default paths.
    ///
    /// The replicated base defaults to `<directory>/replicated_base.yaml`
    /// and the output to `<target>.yaml`.
    pub fn new(directory: impl Into<PathBuf>, target: impl Into<String>) -> Result<Self> {
        let directory = directory.into();
        let target = target.into();
        if target.is_empty() {
            return Err(Error::Config {
                message: "Target must not be empty".to_string(),
                hint: None,
            });
        }

        Ok(Self {
            repl_base: default_repl_base(&directory),
            output: default_output(&target),
            directory,
            recursive: true,
            target,
            tag_overrides: TagOverrides::new(),
            mode: OutputMode::Plain,
            resolver: ResolverOptions::default(),
        })
    }

    /// Low-level keys whose serialized values are unquoted.
    pub fn scalar_keys(&self) -> &[String] {
        &self.resolver.scalar_keys
    }
}

/// `<directory>/replicated_base.yaml`
pub fn default_repl_base(directory: &Path) -> PathBuf {
    directory.join(DEFAULT_REPL_BASE)
}

/// `<target>.yaml` in the working directory.
pub fn default_output(target: &str) -> PathBuf {
    PathBuf::from(format!("{}.yaml", target))
}

/// Parse `name:tag` override strings.
///
/// A later override for the same image name wins.
pub fn parse_tag_overrides<S: AsRef<str>>(values: &[S]) -> Result<TagOverrides> {
    let mut overrides = TagOverrides::new();
    for value in values {
        let value = value.as_ref();
        match value.split_once(':') {
            Some((name, tag)) if !name.is_empty() && !tag.is_empty() => {
                overrides.insert(name.to_string(), tag.to_string());
            }
            _ => {
                return Err(Error::Config {
                    message: format!("Invalid image override '{}'", value),
                    hint: Some("Use the form name:tag, e.g. gcr.io/acme/server:1.0".to_string()),
                })
            }
        }
    }
    Ok(overrides)
}

/// Parse `endpoint/source` registry strings.
pub fn parse_registries<S: AsRef<str>>(values: &[S]) -> Result<Vec<Registry>> {
    values
        .iter()
        .map(|value| {
            let value = value.as_ref();
            match value.split_once('/') {
                Some((endpoint, source))
                    if !endpoint.is_empty() && !source.is_empty() && !source.contains('/') =>
                {
                    Ok(Registry {
                        endpoint: endpoint.to_string(),
                        source: source.to_string(),
                    })
                }
                _ => Err(Error::Config {
                    message: format!("Invalid registry '{}'", value),
                    hint: Some("Use the form endpoint/source, e.g. gcr.io/acme".to_string()),
                }),
            }
        })
        .collect()
}
