//! Target-level specification entities.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Settings;

/// Prefix shared by every Apple product-type identifier
pub const PRODUCT_TYPE_PREFIX: &str = "com.apple.product-type.";

/// A buildable target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    /// Product type tag. `":<suffix>"` is shorthand for
    /// `com.apple.product-type.<suffix>`. Optional so that variant overlays can
    /// leave it out; base targets must carry one.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<TargetConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_directories: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_directories: Vec<PathBuf>,
    /// Glob patterns, relative to the project base directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_excludes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FileOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prebuild_scripts: Vec<RunScript>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub postbuild_scripts: Vec<RunScript>,
}

impl Target {
    /// An empty target of the given type
    pub fn new(name: impl Into<String>, target_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.map(str::to_string),
            configurations: Vec::new(),
            source_directories: Vec::new(),
            resource_directories: Vec::new(),
            file_excludes: Vec::new(),
            references: Vec::new(),
            options: Vec::new(),
            prebuild_scripts: Vec::new(),
            postbuild_scripts: Vec::new(),
        }
    }

    /// The fully qualified product-type identifier
    pub fn product_type(&self) -> Option<String> {
        self.target_type.as_deref().map(expand_product_type)
    }

    /// The short product-type tag, also used as a profile name
    pub fn raw_type(&self) -> Option<&str> {
        self.target_type.as_deref().map(|t| {
            let t = t.strip_prefix(':').unwrap_or(t);
            t.strip_prefix(PRODUCT_TYPE_PREFIX).unwrap_or(t)
        })
    }

    pub fn configuration(&self, name: &str) -> Option<&TargetConfiguration> {
        self.configurations.iter().find(|c| c.name == name)
    }
}

/// Expand the `":<suffix>"` shorthand into a full product-type identifier
pub fn expand_product_type(target_type: &str) -> String {
    match target_type.strip_prefix(':') {
        Some(suffix) => format!("{}{}", PRODUCT_TYPE_PREFIX, suffix),
        None => target_type.to_string(),
    }
}

/// Collapse a product-type identifier into the `":<suffix>"` shorthand when
/// possible
pub fn shorten_product_type(product_type: &str) -> String {
    match product_type.strip_prefix(PRODUCT_TYPE_PREFIX) {
        Some(suffix) => format!(":{}", suffix),
        None => product_type.to_string(),
    }
}

/// Per-target build configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfiguration {
    pub name: String,
    /// Explicit settings layered over the resolved profiles
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: Settings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    #[serde(default, rename = "source", skip_serializing_if = "Option::is_none")]
    pub source_file_path: Option<PathBuf>,
}

impl TargetConfiguration {
    pub fn new(name: impl Into<String>, profiles: Vec<String>) -> Self {
        Self {
            name: name.into(),
            settings: Settings::new(),
            profiles,
            source_file_path: None,
        }
    }
}

/// Embedding options carried by linkable references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSettings {
    /// Copy the product into the target's bundle
    #[serde(default = "default_true")]
    pub copy: bool,
    /// Code-sign the copied product
    #[serde(default = "default_true")]
    pub code_sign_on_copy: bool,
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            copy: true,
            code_sign_on_copy: true,
        }
    }
}

impl ReferenceSettings {
    /// Settings for a reference that is linked but never embedded
    pub fn link_only() -> Self {
        Self {
            copy: false,
            code_sign_on_copy: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Something a target links against or depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Reference {
    /// A framework shipped with the SDK, e.g. `UIKit`
    SystemFramework { name: String },
    /// A library shipped with the SDK, e.g. `libz.tbd`
    SystemLibrary { name: String },
    /// A prebuilt `.framework` bundle inside the project
    LocalFramework {
        path: PathBuf,
        #[serde(default)]
        settings: ReferenceSettings,
    },
    /// A prebuilt static or dynamic library inside the project
    LocalLibrary {
        path: PathBuf,
        #[serde(default)]
        settings: ReferenceSettings,
    },
    /// A framework produced by a target of another native project
    SubprojectFramework {
        project: PathBuf,
        name: String,
        #[serde(default)]
        settings: ReferenceSettings,
    },
    /// Another target of the same project
    Target {
        name: String,
        #[serde(default)]
        settings: ReferenceSettings,
    },
}

impl Reference {
    /// A short human-readable label used in diagnostics
    pub fn label(&self) -> String {
        match self {
            Reference::SystemFramework { name } => format!("{}.framework", name),
            Reference::SystemLibrary { name } => name.clone(),
            Reference::LocalFramework { path, .. } | Reference::LocalLibrary { path, .. } => {
                path.display().to_string()
            }
            Reference::SubprojectFramework { project, name, .. } => {
                format!("{}:{}", project.display(), name)
            }
            Reference::Target { name, .. } => name.clone(),
        }
    }
}

/// Per-file compiler flags selected by glob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOption {
    /// Glob relative to the project base directory
    pub glob: String,
    pub flags: String,
}

/// A shell script run before or after the target's build phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Script file relative to the project base directory
    pub script_path: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
}

impl RunScript {
    pub fn new(script_path: impl Into<PathBuf>) -> Self {
        Self {
            name: None,
            script_path: script_path.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            shell: None,
        }
    }

    /// Display name of the generated build phase
    pub fn phase_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Run Script ({})", self.script_path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_product_type_shorthand() {
        assert_eq!(
            expand_product_type(":application"),
            "com.apple.product-type.application"
        );
        assert_eq!(
            expand_product_type("com.apple.product-type.framework"),
            "com.apple.product-type.framework"
        );
    }

    #[test]
    fn test_shorten_product_type() {
        assert_eq!(
            shorten_product_type("com.apple.product-type.app-extension"),
            ":app-extension"
        );
        assert_eq!(shorten_product_type("org.example.custom"), "org.example.custom");
    }

    #[test]
    fn test_raw_type() {
        let target = Target::new("App", Some(":application.watchapp2"));
        assert_eq!(target.raw_type(), Some("application.watchapp2"));

        let full = Target::new("Lib", Some("com.apple.product-type.framework"));
        assert_eq!(full.raw_type(), Some("framework"));

        assert_eq!(Target::new("Overlay", None).raw_type(), None);
    }

    #[test]
    fn test_reference_settings_default_to_embedding() {
        let reference: Reference = serde_yaml::from_str(
            r#"
kind: local-framework
path: Vendor/Kit.framework
"#,
        )
        .unwrap();
        match reference {
            Reference::LocalFramework { settings, .. } => {
                assert!(settings.copy);
                assert!(settings.code_sign_on_copy);
            }
            other => panic!("unexpected reference: {other:?}"),
        }
    }

    #[test]
    fn test_reference_tagged_deserialization() {
        let references: Vec<Reference> = serde_yaml::from_str(
            r#"
- kind: system-framework
  name: UIKit
- kind: target
  name: Core
  settings:
    copy: false
- kind: subproject-framework
  project: Vendor/Vendor.xcodeproj
  name: Vendor
"#,
        )
        .unwrap();
        assert_eq!(references.len(), 3);
        assert_eq!(
            references[1],
            Reference::Target {
                name: "Core".to_string(),
                settings: ReferenceSettings {
                    copy: false,
                    code_sign_on_copy: true
                }
            }
        );
    }

    #[test]
    fn test_run_script_phase_name() {
        let mut script = RunScript::new("scripts/lint.sh");
        assert_eq!(script.phase_name(), "Run Script (scripts/lint.sh)");
        script.name = Some("Lint".to_string());
        assert_eq!(script.phase_name(), "Lint");
    }
}
