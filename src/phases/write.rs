//! Phase 5: Writing to Disk
//!
//! This is the final phase of a unification run. It writes the composed
//! document to the output path. Parent directories are not created; a
//! missing or unwritable destination is reported as an error.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};

/// Execute Phase 5: write the unified document to `output_path`
pub fn execute(document: &str, output_path: &Path) -> Result<()> {
    info!("Writing output to {}", output_path.display());
    fs::write(output_path, document).map_err(|e| Error::Filesystem {
        message: format!("Failed to write output '{}': {}", output_path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::execute;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_phase5_write_document() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("prod.yaml");

        execute("---\nkind: Service", &output_path).unwrap();

        assert_eq!(
            fs::read_to_string(&output_path).unwrap(),
            "---\nkind: Service"
        );
    }

    #[test]
    fn test_phase5_overwrite_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("prod.yaml");
        fs::write(&output_path, "old content").unwrap();

        execute("new content", &output_path).unwrap();

        assert_eq!(fs::read_to_string(&output_path).unwrap(), "new content");
    }

    #[test]
    fn test_phase5_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("missing/prod.yaml");

        let result = execute("content", &output_path);

        assert!(matches!(result, Err(Error::Filesystem { .. })));
        assert!(!output_path.exists());
    }
}
