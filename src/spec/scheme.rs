//! Scheme entities: a named bundle of build/test/launch/profile/archive/analyze
//! actions bound to targets by name.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub name: String,
    #[serde(default, rename = "build", skip_serializing_if = "Option::is_none")]
    pub build_action: Option<BuildAction>,
    #[serde(default, rename = "test", skip_serializing_if = "Option::is_none")]
    pub test_action: Option<TestAction>,
    #[serde(default, rename = "launch", skip_serializing_if = "Option::is_none")]
    pub launch_action: Option<LaunchAction>,
    #[serde(default, rename = "archive", skip_serializing_if = "Option::is_none")]
    pub archive_action: Option<ArchiveAction>,
    #[serde(default, rename = "profile", skip_serializing_if = "Option::is_none")]
    pub profile_action: Option<ProfileAction>,
    #[serde(default, rename = "analyze", skip_serializing_if = "Option::is_none")]
    pub analyze_action: Option<AnalyzeAction>,
}

impl Scheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            build_action: None,
            test_action: None,
            launch_action: None,
            archive_action: None,
            profile_action: None,
            analyze_action: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuildAction {
    #[serde(default)]
    pub targets: Vec<BuildActionTarget>,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub build_implicit: bool,
}

/// Which scheme actions build a given target
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildActionTarget {
    pub name: String,
    #[serde(default)]
    pub archiving_enabled: bool,
    #[serde(default)]
    pub running_enabled: bool,
    #[serde(default)]
    pub profiling_enabled: bool,
    #[serde(default)]
    pub testing_enabled: bool,
    #[serde(default)]
    pub analyzing_enabled: bool,
}

impl BuildActionTarget {
    /// A target built for every action
    pub fn all(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            archiving_enabled: true,
            running_enabled: true,
            profiling_enabled: true,
            testing_enabled: true,
            analyzing_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_configuration: Option<String>,
    #[serde(default)]
    pub targets: Vec<TestTarget>,
    #[serde(default)]
    pub inherit_launch_arguments: bool,
    #[serde(default)]
    pub code_coverage_enabled: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

/// A testable target, optionally living in another native project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestTarget {
    pub name: String,
    /// Path of the native project containing the target, relative to the
    /// project base directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
}

impl TestTarget {
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LaunchAction {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_configuration: Option<String>,
    #[serde(default)]
    pub simulate_location: bool,
    /// Command-line arguments as one shell-like string
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arguments: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArchiveAction {
    /// Custom archive name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_configuration: Option<String>,
    #[serde(default)]
    pub reveal: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileAction {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_configuration: Option<String>,
    #[serde(default)]
    pub inherit_environment: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyzeAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_configuration: Option<String>,
}
