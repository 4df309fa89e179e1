//! # Specification Data Model and Parsing
//!
//! This module defines the declarative project specification: a versioned
//! document describing configurations, targets, variants and schemes in terms
//! of named settings profiles plus explicit overrides.
//!
//! ## Key Components
//!
//! - **`Specification`**: the root document. It owns every child entity and is
//!   treated as immutable while a transform pass runs; variants clone it.
//! - **`Configuration`**: a project-level build configuration (profiles +
//!   overrides + debug/release type).
//! - **`Variant`**: a named overlay of partial targets applied on top of the
//!   base specification.
//! - **`target`** and **`scheme`** submodules: per-target and per-scheme
//!   entities.
//!
//! ## Parsing
//!
//! The textual format is plain serde: YAML for `.yml`, `.yaml` and `Specfile`
//! inputs, JSON for `.json`. After deserialization the document is checked for
//! the structural requirements every transform relies on (at least one
//! configuration somewhere, every target has a product type).

pub mod scheme;
pub mod target;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use scheme::{
    AnalyzeAction, ArchiveAction, BuildAction, BuildActionTarget, LaunchAction, ProfileAction,
    Scheme, TestAction, TestTarget,
};
pub use target::{
    FileOption, Reference, ReferenceSettings, RunScript, Target, TargetConfiguration,
};

/// Flat build settings bundle (key → arbitrary value)
pub type Settings = BTreeMap<String, serde_yaml::Value>;

/// The newest specification schema this crate knows how to produce
pub const LATEST_SPEC_VERSION: Version = Version::new(3, 0, 0);

/// Name of the anonymous default variant
pub const BASE_VARIANT: &str = "$base";

/// Name given to the project produced from the base variant
pub const DEFAULT_PROJECT_NAME: &str = "project";

/// Root of a specification document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    /// Schema version of this document
    pub version: Version,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<Configuration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Target>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<Scheme>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
    /// Directory relative paths are resolved against. Filled from the
    /// document's location when parsing; never serialized.
    #[serde(default, skip_serializing)]
    pub base_directory: PathBuf,
    /// Whether a dependency manager integrates with the generated project
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub includes_dependency_manager: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_generate_hook: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_generate_hook: Option<PathBuf>,
}

impl Specification {
    /// Create an empty document at the given version
    pub fn new(version: Version, base_directory: impl Into<PathBuf>) -> Self {
        Self {
            version,
            configurations: Vec::new(),
            targets: Vec::new(),
            schemes: Vec::new(),
            variants: Vec::new(),
            base_directory: base_directory.into(),
            includes_dependency_manager: false,
            pre_generate_hook: None,
            post_generate_hook: None,
        }
    }

    /// Names of every declared project configuration, in declaration order
    pub fn configuration_names(&self) -> Vec<&str> {
        self.configurations.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Resolve a possibly relative path against the base directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_directory.join(path)
    }

    /// Check the structural requirements every transform relies on. A
    /// document must declare at least one configuration, at project level or
    /// on one of its targets.
    pub fn validate(&self) -> Result<()> {
        if self.configurations.is_empty()
            && self.targets.iter().all(|t| t.configurations.is_empty())
        {
            return Err(Error::MissingConfigurations);
        }
        for target in &self.targets {
            if target.target_type.is_none() {
                return Err(Error::MissingField {
                    entity: "target".to_string(),
                    name: target.name.clone(),
                    field: "type".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Debug or release flavour of a build configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationType {
    Debug,
    Release,
}

impl ConfigurationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigurationType::Debug => "debug",
            ConfigurationType::Release => "release",
        }
    }

    /// Default project-level profiles for this flavour
    pub fn default_profiles(&self) -> Vec<String> {
        vec![
            format!("general:{}", self.as_str()),
            format!("ios:{}", self.as_str()),
        ]
    }

    /// Classifier used when importing: a configuration whose name mentions
    /// "debug" is a debug configuration, anything else is release.
    pub fn classify(name: &str) -> Self {
        if name.to_lowercase().contains("debug") {
            ConfigurationType::Debug
        } else {
            ConfigurationType::Release
        }
    }
}

/// A project-level build configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    /// Ordered profile names; later entries override earlier ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    /// Explicit settings layered over the resolved profiles
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: Settings,
    #[serde(rename = "type")]
    pub config_type: ConfigurationType,
    /// External settings file attached to the configuration
    #[serde(default, rename = "source", skip_serializing_if = "Option::is_none")]
    pub source_file_path: Option<PathBuf>,
}

impl Configuration {
    /// A configuration using the default profiles of its flavour
    pub fn new(name: impl Into<String>, config_type: ConfigurationType) -> Self {
        Self {
            name: name.into(),
            profiles: config_type.default_profiles(),
            overrides: Settings::new(),
            config_type,
            source_file_path: None,
        }
    }
}

/// A named overlay of partial targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    /// Abstract variants are never expanded into projects
    #[serde(default, rename = "abstract", skip_serializing_if = "std::ops::Not::not")]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Target>,
}

impl Variant {
    pub fn new(name: impl Into<String>, targets: Vec<Target>) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            targets,
        }
    }
}

/// Parse a YAML specification document
pub fn parse(yaml_content: &str) -> Result<Specification> {
    let spec: Specification = serde_yaml::from_str(yaml_content).map_err(Error::Yaml)?;
    spec.validate()?;
    Ok(spec)
}

/// Parse a JSON specification document
pub fn parse_json(json_content: &str) -> Result<Specification> {
    let spec: Specification = serde_json::from_str(json_content).map_err(Error::Json)?;
    spec.validate()?;
    Ok(spec)
}

/// Whether the path names a specification document (as opposed to a native
/// project).
pub fn is_specification_path(path: &Path) -> bool {
    if path.file_name().and_then(|n| n.to_str()) == Some("Specfile") {
        return true;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml") | Some("json")
    )
}

/// Load a specification from disk, choosing the format from the file name
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Specification> {
    let path = path.as_ref();
    if !is_specification_path(path) {
        return Err(Error::UnsupportedInput {
            path: path.to_path_buf(),
            hint: Some("expected a .yml, .yaml or .json file, or a file named Specfile".to_string()),
        });
    }

    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    let mut spec = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json(&content)?,
        _ => parse(&content)?,
    };

    if spec.base_directory.as_os_str().is_empty() {
        spec.base_directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
    }
    Ok(spec)
}

/// Serialize a specification as YAML
pub fn to_yaml(spec: &Specification) -> Result<String> {
    serde_yaml::to_string(spec).map_err(Error::Yaml)
}
