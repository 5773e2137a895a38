//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest("svc.yaml", manifests::SERVICE);
//!     fixture.unify("prod").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest snippets shared between test files.
#[allow(dead_code)]
pub mod manifests {
    /// Service with a per-target spec.
    pub const SERVICE: &str = "\
kind: Service
metadata:
  name: web
spec-prod:
  type: LoadBalancer
spec-dev:
  type: NodePort
";

    /// Deployment that needs the service and pins an image.
    pub const DEPLOYMENT: &str = "\
dependencies:
  - svc.yaml
kind: Deployment
metadata:
  name: web
spec:
  replicas-prod: \"3\"
  replicas-dev: \"1\"
  template:
    spec:
      containers:
        - name: web
          image: gcr.io/acme/server
";

    /// Job only rendered for the dev target.
    pub const DEV_ONLY_JOB: &str = "\
targetsOnly: dev
kind: Job
metadata:
  name: seed
";

    /// Base document for replicated releases.
    pub const REPLICATED_BASE: &str = "\
replicated_api_version: 2.9.2
name: web
";
}

/// A test fixture holding a temporary manifest directory.
///
/// Manifests are written under `manifests/` and the unified document is
/// written next to it, so discovery never sees the output.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty manifest directory.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("manifests")
            .create_dir_all()
            .expect("Failed to create manifest directory");
        Self { temp_dir }
    }

    /// Add a manifest at `path`, relative to the manifest directory.
    pub fn with_manifest(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("manifests")
            .child(path)
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the manifest directory.
    pub fn manifest_dir(&self) -> PathBuf {
        self.temp_dir.path().join("manifests")
    }

    /// Get the path the unified document is written to.
    pub fn output_path(&self) -> PathBuf {
        self.temp_dir.path().join("unified.yaml")
    }

    /// The output path as a fixture child, for path assertions.
    #[allow(dead_code)]
    pub fn child_output(&self) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child("unified.yaml")
    }

    /// Read the unified document back.
    #[allow(dead_code)]
    pub fn output(&self) -> String {
        std::fs::read_to_string(self.output_path()).expect("Failed to read unified output")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("kondunite");
        cmd.current_dir(self.path())
            .env_remove("KONDUNITE_TARGET")
            .env_remove("KONDUNITE_OUTPUT")
            .env_remove("RUST_LOG")
            .env_remove("RUST_BACKTRACE")
            .env_remove("RUST_LIB_BACKTRACE");
        cmd
    }

    /// Create a `unify` command for `target` writing to [`Self::output_path`].
    pub fn unify(&self, target: &str) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.args(["--color", "never", "unify", "--target", target])
            .arg("--output")
            .arg(self.output_path())
            .arg(self.manifest_dir());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_manifest_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.manifest_dir().is_dir());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest("nested/svc.yaml", manifests::SERVICE);
        assert!(fixture.manifest_dir().join("nested/svc.yaml").exists());
    }

    #[test]
    fn test_manifests_are_valid_yaml() {
        for manifest in [
            manifests::SERVICE,
            manifests::DEPLOYMENT,
            manifests::DEV_ONLY_JOB,
            manifests::REPLICATED_BASE,
        ] {
            serde_yaml::from_str::<serde_yaml::Value>(manifest).expect("Manifest should be valid YAML");
        }
    }
}
