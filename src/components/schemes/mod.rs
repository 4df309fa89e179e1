//! # Schemes
//!
//! Schemes are converted after every target exists, since their actions bind
//! targets by name. Each action is handled in [`actions`]; arguments and
//! environment variables in [`arguments`].
//!
//! ## Build configuration names
//!
//! An action names the configuration it uses. When that name is not one of the
//! project's configurations it is remapped through a legacy table
//! (`debug` ↔ `Debug`, `release` ↔ `Release`), and when that fails too the
//! first project configuration is used. An action without a name silently uses
//! the first configuration.

pub mod actions;
pub mod arguments;

use std::path::{Path, PathBuf};

use log::debug;

use super::Context;
use crate::error::Result;
use crate::native::scheme::BuildableReference;
use crate::native::{NativeProject, NativeScheme};
use crate::spec::Scheme;

const LEGACY_CONFIGURATION_NAMES: &[(&str, &str)] = &[
    ("debug", "Debug"),
    ("release", "Release"),
    ("Debug", "debug"),
    ("Release", "release"),
];

/// What scheme actions resolve against: the finished native project and the
/// container path its targets are referenced through
pub struct SchemeScope<'a> {
    pub ctx: Context<'a>,
    pub project: &'a NativeProject,
    pub container: PathBuf,
    configurations: Vec<String>,
}

impl<'a> SchemeScope<'a> {
    pub fn new(ctx: Context<'a>, project: &'a NativeProject, container: &Path) -> Self {
        Self {
            ctx,
            project,
            container: container.to_path_buf(),
            configurations: project.configurations.iter().map(|c| c.name.clone()).collect(),
        }
    }

    /// Configuration name an action ends up using
    pub fn configuration(&self, declared: Option<&str>, scheme: &str) -> String {
        let first = self.configurations.first().cloned().unwrap_or_default();
        let Some(declared) = declared else {
            return first;
        };
        if self.configurations.iter().any(|c| c == declared) {
            return declared.to_string();
        }

        let remapped = LEGACY_CONFIGURATION_NAMES
            .iter()
            .find(|(legacy, _)| *legacy == declared)
            .map(|(_, current)| *current)
            .filter(|current| self.configurations.iter().any(|c| c == current));
        match remapped {
            Some(current) => {
                debug!("Scheme {}: using configuration {} for {}", scheme, current, declared);
                current.to_string()
            }
            None => {
                self.ctx.diagnostics.warn(format!(
                    "Scheme '{}' uses unknown configuration '{}', falling back to '{}'",
                    scheme, declared, first
                ));
                first
            }
        }
    }

    /// Reference to a target of the project being built
    pub fn buildable(&self, target_name: &str) -> Option<BuildableReference> {
        let id = self.project.target_by_name(target_name)?;
        let target = self.project.target(id);
        Some(BuildableReference::new(
            &target.name,
            &target.product_name,
            &self.container,
        ))
    }
}

/// Container path of a project: its file name
pub fn container_path(project_path: &Path) -> PathBuf {
    project_path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| project_path.to_path_buf())
}

pub fn export(
    ctx: &Context,
    schemes: &[Scheme],
    project: &NativeProject,
    project_path: &Path,
) -> Result<Vec<NativeScheme>> {
    let scope = SchemeScope::new(*ctx, project, &container_path(project_path));
    schemes
        .iter()
        .map(|scheme| export_scheme(&scope, scheme))
        .collect()
}

fn export_scheme(scope: &SchemeScope, scheme: &Scheme) -> Result<NativeScheme> {
    let name = &scheme.name;
    let mut native = NativeScheme::new(name.clone());
    native.build_action = scheme
        .build_action
        .as_ref()
        .map(|a| actions::export_build(scope, name, a));
    native.test_action = scheme
        .test_action
        .as_ref()
        .map(|a| actions::export_test(scope, name, a));
    native.launch_action = scheme
        .launch_action
        .as_ref()
        .map(|a| actions::export_launch(scope, name, a))
        .transpose()?;
    native.profile_action = scheme
        .profile_action
        .as_ref()
        .map(|a| actions::export_profile(scope, name, a));
    native.archive_action = scheme
        .archive_action
        .as_ref()
        .map(|a| actions::export_archive(scope, name, a));
    native.analyze_action = scheme
        .analyze_action
        .as_ref()
        .map(|a| actions::export_analyze(scope, name, a));
    Ok(native)
}

/// Specification schemes for the native schemes of the project at
/// `project_path`
pub fn import(schemes: &[NativeScheme], project_path: &Path) -> Vec<Scheme> {
    let container = container_path(project_path);
    schemes
        .iter()
        .map(|native| Scheme {
            name: native.name.clone(),
            build_action: native.build_action.as_ref().map(actions::import_build),
            test_action: native
                .test_action
                .as_ref()
                .map(|a| actions::import_test(a, &container)),
            launch_action: native.launch_action.as_ref().map(actions::import_launch),
            archive_action: native.archive_action.as_ref().map(actions::import_archive),
            profile_action: native.profile_action.as_ref().map(actions::import_profile),
            analyze_action: native.analyze_action.as_ref().map(actions::import_analyze),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::testing::Fixture;
    use crate::native::{constants, BuildConfiguration};
    use crate::spec::{LaunchAction, Settings};

    fn project() -> NativeProject {
        let mut project = NativeProject::new();
        project.configurations = vec![
            BuildConfiguration::new("Debug", Settings::new()),
            BuildConfiguration::new("Release", Settings::new()),
        ];
        project.add_target("App", constants::APPLICATION);
        project
    }

    #[test]
    fn test_configuration_resolution() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("/work"));
        let project = project();
        let scope = SchemeScope::new(ctx, &project, Path::new("App.xcodeproj"));

        assert_eq!(scope.configuration(None, "App"), "Debug");
        assert_eq!(scope.configuration(Some("Release"), "App"), "Release");
        assert_eq!(scope.configuration(Some("release"), "App"), "Release");
        assert!(fixture.diagnostics.is_empty());

        assert_eq!(scope.configuration(Some("Staging"), "App"), "Debug");
        assert_eq!(fixture.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_launch_without_configuration_uses_first() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("/work"));
        let project = project();
        let mut scheme = Scheme::new("App");
        scheme.launch_action = Some(LaunchAction {
            target: "App".to_string(),
            ..LaunchAction::default()
        });

        let native = export(&ctx, &[scheme], &project, Path::new("/out/App.xcodeproj")).unwrap();
        let launch = native[0].launch_action.as_ref().unwrap();
        assert_eq!(launch.build_configuration, "Debug");
        let runnable = launch.runnable.as_ref().unwrap();
        assert_eq!(runnable.buildable_name, "App.app");
        assert_eq!(runnable.container, "container:App.xcodeproj");
    }

    #[test]
    fn test_import_round_trips_names() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("/work"));
        let project = project();
        let mut scheme = Scheme::new("App");
        scheme.launch_action = Some(LaunchAction {
            target: "App".to_string(),
            build_configuration: Some("Release".to_string()),
            arguments: "-v \"a b\"".to_string(),
            ..LaunchAction::default()
        });

        let path = Path::new("/out/App.xcodeproj");
        let native = export(&ctx, &[scheme.clone()], &project, path).unwrap();
        let imported = import(&native, path);
        assert_eq!(imported, vec![scheme]);
    }

    #[test]
    fn test_container_path_is_file_name() {
        assert_eq!(
            container_path(Path::new("/out/App.xcodeproj")),
            PathBuf::from("App.xcodeproj")
        );
    }
}
