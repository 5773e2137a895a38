//! Phase 1: Manifest Discovery
//!
//! This is the first phase of a unification run. It finds the manifest
//! files that the later phases load.
//!
//! ## Process
//!
//! 1.  **Glob**: `<directory>/**/*.yaml` is matched, or `<directory>/*.yaml`
//!     when recursion is disabled. The directory part is escaped so paths
//!     containing glob metacharacters are matched literally.
//!
//! 2.  **Exclusion**: The replicated base and the output file are never
//!     manifests, even when they live inside the manifest directory.
//!
//! 3.  **Sorting**: Paths are sorted so repeated runs read files in the same
//!     order. The emission order is still decided by Phase 3 alone.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Error, Result};

/// Execute Phase 1: find manifest files under `directory`
///
/// Paths listed in `excluded` are dropped from the result. They are
/// compared after canonicalization, so `./dir/base.yaml` and
/// `dir/base.yaml` name the same file.
pub fn execute(directory: &Path, recursive: bool, excluded: &[&Path]) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(Error::Discovery {
            message: format!("'{}' is not a directory", directory.display()),
        });
    }

    let escaped = glob::Pattern::escape(&directory.to_string_lossy());
    let pattern = if recursive {
        format!("{}/**/*.yaml", escaped)
    } else {
        format!("{}/*.yaml", escaped)
    };

    let excluded: Vec<PathBuf> = excluded.iter().map(|path| canonical(path)).collect();

    let mut manifests = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) => {
                if !path.is_file() || excluded.contains(&canonical(&path)) {
                    continue;
                }
                info!("Discovered file {}", path.display());
                manifests.push(path);
            }
            Err(e) => warn!("Skipping unreadable path: {}", e),
        }
    }

    manifests.sort();
    Ok(manifests)
}

/// Name under which a manifest file takes part in dependency ordering.
pub fn manifest_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
