//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then `use common::prelude::*;`.
//!
//! ```rust,ignore
//! let fixture = TestFixture::new().with_spec(specs::MINIMAL);
//! fixture.command().arg("generate").arg(fixture.spec_path()).assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::specs;
    pub use super::TestFixture;
}

/// Specification documents used across tests.
#[allow(dead_code)]
pub mod specs {
    /// One configuration, one application target.
    pub const MINIMAL: &str = r#"
version: 3.0.0
configurations:
  - name: Debug
    type: debug
    profiles: ["general:debug", "ios:debug"]
targets:
  - name: App
    type: ":application"
"#;

    /// A target configuration naming a profile nobody provides.
    pub const UNKNOWN_PROFILE: &str = r#"
version: 3.0.0
targets:
  - name: App
    type: ":application"
    configurations:
      - name: Debug
        profiles: ["general:debug", "ios:nonexistent"]
"#;

    /// A launch action without a build configuration.
    pub const WITH_SCHEME: &str = r#"
version: 3.0.0
configurations:
  - name: Debug
    type: debug
    profiles: ["general:debug", "ios:debug"]
  - name: Release
    type: release
    profiles: ["general:release", "ios:release"]
targets:
  - name: App
    type: ":application"
    source_directories: ["Sources"]
schemes:
  - name: App
    launch:
      target: App
      arguments: "-v \"two words\""
"#;

    /// Two concrete variants and an abstract one.
    pub const WITH_VARIANTS: &str = r#"
version: 3.0.0
configurations:
  - name: Debug
    type: debug
    profiles: ["general:debug", "ios:debug"]
targets:
  - name: App
    type: ":application"
variants:
  - name: $base
  - name: Pro
    targets:
      - name: App
        configurations:
          - name: Debug
            settings:
              PRODUCT_NAME: AppPro
  - name: Shared
    abstract: true
"#;

    /// No configuration anywhere.
    pub const NO_CONFIGURATIONS: &str = r#"
version: 3.0.0
targets:
  - name: App
    type: ":application"
"#;
}

/// A temporary directory holding a specification and the files it refers to.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `project.yml` with the given content.
    pub fn with_spec(self, content: &str) -> Self {
        self.temp_dir
            .child("project.yml")
            .write_str(content)
            .expect("Failed to write specification");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn spec_path(&self) -> PathBuf {
        self.temp_dir.path().join("project.yml")
    }

    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command running in this fixture's directory, with colors
    /// off so output can be matched literally.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("specweave");
        cmd.current_dir(self.path())
            .env_remove("SPECWEAVE_PROFILES")
            .arg("--color")
            .arg("never");
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
    fn test_fixture_with_spec() {
        let fixture = TestFixture::new().with_spec(specs::MINIMAL);
        assert!(fixture.spec_path().exists());
    }

    #[test]
    fn test_specs_are_valid_yaml() {
        for spec in [
            specs::MINIMAL,
            specs::UNKNOWN_PROFILE,
            specs::WITH_SCHEME,
            specs::WITH_VARIANTS,
            specs::NO_CONFIGURATIONS,
        ] {
            let parsed: Result<serde_yaml::Value, _> = serde_yaml::from_str(spec);
            assert!(parsed.is_ok(), "invalid YAML: {}", spec);
        }
    }
}
