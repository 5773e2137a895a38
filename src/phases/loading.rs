//! Phase 2: Loading Manifests
//!
//! This is the second phase of a unification run. It turns every discovered
//! manifest file into serialized, target-resolved document fragments and
//! records what the later phases need to know about each file.
//!
//! ## Process
//!
//! For each file, and for each `---`-delimited document in it:
//!
//! 1.  **Parse**: Documents that are not valid YAML, or whose root is not a
//!     mapping, are logged and skipped. Empty documents are skipped quietly.
//!
//! 2.  **Metadata**: `targetsOnly`, `dependencies` and `replKind` are taken
//!     out of the document. A document restricted to another target is
//!     dropped entirely. Dependencies become edges in the run's dependency
//!     graph; `replKind` becomes the kind annotation of the fragment.
//!
//! 3.  **Resolution**: Target-suffixed nodes are resolved, then image tags
//!     are rewritten and the images collected.
//!
//! 4.  **Serialization**: The document is dumped, allowed low-level scalars
//!     are unquoted, and a `---` plus `# kind:` header is prepended.
//!
//! Every discovered file gets a dependency-graph entry, even when none of
//! its documents survive.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use log::{debug, warn};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use super::discovery::manifest_name;
use super::{RunContext, DEFAULT_REPL_KIND};
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::images::{collect_and_rewrite, ImageRef};
use crate::target::resolve;
use crate::unquote::unquote_scalar_keys;

/// Line separating documents inside a manifest file.
pub const DOCUMENT_DELIMITER: &str = "---";

/// Keys consumed from a document before it is resolved.
const META_KEYS: &[&str] = &["targetsOnly", "dependencies", "replKind"];

/// Per-document metadata, stripped from the emitted manifest.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    /// Only emit this document for the named target
    pub targets_only: Option<String>,
    /// Files that must be emitted before this document's file
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Kind annotation for replicated releases
    pub repl_kind: Option<String>,
}

impl DocumentMeta {
    /// Remove the metadata keys from `root` and deserialize them.
    pub fn take(root: &mut Mapping) -> std::result::Result<Self, serde_yaml::Error> {
        let mut meta = Mapping::new();
        for key in META_KEYS {
            if let Some(value) = root.shift_remove(*key) {
                meta.insert(Value::from(*key), value);
            }
        }
        serde_yaml::from_value(Value::Mapping(meta))
    }

    /// Whether the document belongs in the output for `target`.
    pub fn applies_to(&self, target: &str) -> bool {
        self.targets_only.as_deref().is_none_or(|only| only == target)
    }
}

/// A document that survived loading.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub dependencies: Vec<String>,
    pub images: BTreeSet<ImageRef>,
    /// `---`, the kind comment, and the serialized body
    pub fragment: String,
}

/// Execute Phase 2: load every manifest into `context`
///
/// A file that cannot be read aborts the run; a document that cannot be
/// used is skipped with a warning.
pub fn execute(manifests: &[PathBuf], config: &RunConfig, context: &mut RunContext) -> Result<()> {
    for path in manifests {
        let content = fs::read_to_string(path).map_err(|e| Error::Filesystem {
            message: format!("Failed to read manifest '{}': {}", path.display(), e),
        })?;
        load_file(&manifest_name(path), &content, config, context);
    }
    Ok(())
}

/// Load the documents of one manifest file.
pub fn load_file(file: &str, content: &str, config: &RunConfig, context: &mut RunContext) {
    context.register_file(file);

    for (index, text) in split_documents(content).into_iter().enumerate() {
        match load_document(file, index + 1, text, config) {
            Ok(Some(document)) => {
                for dependency in &document.dependencies {
                    context.add_dependency(file, dependency);
                }
                context.images.extend(document.images);
                context.add_fragment(file, document.fragment);
            }
            Ok(None) => {}
            Err(e) => warn!("{}. Skipping.", e),
        }
    }
}

/// Split file content on `---` delimiter lines.
pub fn split_documents(content: &str) -> Vec<&str> {
    let mut documents = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        if line.trim_end() == DOCUMENT_DELIMITER {
            documents.push(&content[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    documents.push(&content[start..]);
    documents
}

/// Process one document, returning `None` when it contributes nothing.
pub fn load_document(
    file: &str,
    index: usize,
    text: &str,
    config: &RunConfig,
) -> Result<Option<LoadedDocument>> {
    let invalid = |message: String| Error::ManifestParse {
        file: file.to_string(),
        index,
        message,
    };

    let mut root = match serde_yaml::from_str::<Value>(text) {
        Ok(Value::Mapping(root)) if root.is_empty() => {
            debug!("{} (document {}) is empty", file, index);
            return Ok(None);
        }
        Ok(Value::Mapping(root)) => root,
        Ok(Value::Null) => {
            debug!("{} (document {}) is empty", file, index);
            return Ok(None);
        }
        Ok(_) => return Err(invalid("document root is not a mapping".to_string())),
        Err(e) => return Err(invalid(e.to_string())),
    };

    let meta = DocumentMeta::take(&mut root)
        .map_err(|e| invalid(format!("invalid metadata: {}", e)))?;
    if !meta.applies_to(&config.target) {
        debug!(
            "{} (document {}) is limited to target {:?}",
            file, index, meta.targets_only
        );
        return Ok(None);
    }

    resolve(&mut root, &config.target, &config.resolver);
    let images = collect_and_rewrite(&mut root, &config.tag_overrides);

    let body = serde_yaml::to_string(&root).map_err(|e| invalid(e.to_string()))?;
    let body = unquote_scalar_keys(&body, config.scalar_keys());
    let kind = meta.repl_kind.as_deref().unwrap_or(DEFAULT_REPL_KIND);

    Ok(Some(LoadedDocument {
        dependencies: meta.dependencies,
        images,
        fragment: format!("{}\n# kind: {}\n{}", DOCUMENT_DELIMITER, kind, body),
    }))
}
