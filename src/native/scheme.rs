//! Native scheme documents.
//!
//! Schemes are persisted separately from the project graph, next to the
//! project that owns them. They refer to targets through buildable
//! references rather than through [`super::TargetId`]s, because a testable
//! may live in another project.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Reference from a scheme to a target's product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildableReference {
    pub target_name: String,
    /// File name of the product, e.g. `App.app`
    pub buildable_name: String,
    /// `container:<project path>` of the project holding the target
    pub container: String,
}

impl BuildableReference {
    pub fn new(target_name: &str, buildable_name: &str, project_path: &Path) -> Self {
        Self {
            target_name: target_name.to_string(),
            buildable_name: buildable_name.to_string(),
            container: container_for(project_path),
        }
    }

    /// Path of the project the reference points into
    pub fn project_path(&self) -> PathBuf {
        PathBuf::from(self.container.strip_prefix("container:").unwrap_or(&self.container))
    }
}

pub fn container_for(project_path: &Path) -> String {
    format!("container:{}", project_path.display())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLineArgument {
    pub argument: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub key: String,
    pub value: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildActionEntry {
    pub buildable: BuildableReference,
    pub build_for_archiving: bool,
    pub build_for_running: bool,
    pub build_for_profiling: bool,
    pub build_for_testing: bool,
    pub build_for_analyzing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NativeBuildAction {
    pub parallelize_buildables: bool,
    pub build_implicit_dependencies: bool,
    pub entries: Vec<BuildActionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestableReference {
    pub buildable: BuildableReference,
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NativeTestAction {
    pub build_configuration: String,
    pub testables: Vec<TestableReference>,
    pub should_use_launch_scheme_args_env: bool,
    pub code_coverage_enabled: bool,
    pub environment_variables: Vec<EnvironmentVariable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NativeLaunchAction {
    pub build_configuration: String,
    /// Buildable product runnable; absent when the target was not found
    pub runnable: Option<BuildableReference>,
    pub allow_location_simulation: bool,
    pub command_line_arguments: Vec<CommandLineArgument>,
    pub environment_variables: Vec<EnvironmentVariable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NativeProfileAction {
    pub build_configuration: String,
    pub runnable: Option<BuildableReference>,
    pub should_use_launch_scheme_args_env: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NativeArchiveAction {
    pub build_configuration: String,
    pub custom_archive_name: String,
    pub reveal_archive_in_organizer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NativeAnalyzeAction {
    pub build_configuration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeScheme {
    pub name: String,
    #[serde(default)]
    pub build_action: Option<NativeBuildAction>,
    #[serde(default)]
    pub test_action: Option<NativeTestAction>,
    #[serde(default)]
    pub launch_action: Option<NativeLaunchAction>,
    #[serde(default)]
    pub profile_action: Option<NativeProfileAction>,
    #[serde(default)]
    pub archive_action: Option<NativeArchiveAction>,
    #[serde(default)]
    pub analyze_action: Option<NativeAnalyzeAction>,
}

impl NativeScheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            build_action: None,
            test_action: None,
            launch_action: None,
            profile_action: None,
            archive_action: None,
            analyze_action: None,
        }
    }
}
