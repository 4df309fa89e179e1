//! Build configurations, at project and target level.

use std::path::{Path, PathBuf};

use super::settings;
use super::Context;
use crate::error::{Error, Result};
use crate::native::{BuildConfiguration, FileId, NativeProject, SourceTree};
use crate::spec::{Configuration, ConfigurationType, Target, TargetConfiguration};

/// Project-level configuration from its native counterpart
pub fn import_project(
    ctx: &Context,
    native: &BuildConfiguration,
    project: &NativeProject,
) -> Configuration {
    let config_type = ConfigurationType::classify(&native.name);
    let profiles = match settings::string_value(&native.settings, settings::SDKROOT)
        .and_then(settings::platform_for_sdk)
    {
        Some(platform) => vec![
            format!("general:{}", config_type.as_str()),
            format!("{}:{}", platform, config_type.as_str()),
        ],
        None => config_type.default_profiles(),
    };
    let overrides = ctx.settings().reverse_split(&native.settings, &profiles);

    Configuration {
        name: native.name.clone(),
        profiles,
        overrides,
        config_type,
        source_file_path: source_path(native, project),
    }
}

pub fn export_project(
    ctx: &Context,
    config: &Configuration,
    project: &mut NativeProject,
) -> BuildConfiguration {
    let settings = ctx
        .settings()
        .forward_merge(&config.profiles, &config.overrides);
    let mut native = BuildConfiguration::new(&config.name, settings);
    native.base_configuration = attach_source(ctx, config.source_file_path.as_deref(), project);
    native
}

/// Target-level configuration. `product_profile` is the product-type profile
/// kept when the native settings contain all of it.
pub fn import_target(
    ctx: &Context,
    native: &BuildConfiguration,
    project: &NativeProject,
    product_profile: Option<&str>,
) -> TargetConfiguration {
    let config_type = ConfigurationType::classify(&native.name);
    let merger = ctx.settings();

    let mut config = TargetConfiguration::new(&native.name, Vec::new());
    config.source_file_path = source_path(native, project);

    // Without a platform the settings stay unsplit
    let Some(mut profiles) =
        settings::infer_profiles(&native.settings, config_type, ctx.diagnostics)
    else {
        config.settings = native.settings.clone();
        return config;
    };
    if let Some(profile) = product_profile {
        if merger.is_subsumed(profile, &native.settings) {
            profiles.push(profile.to_string());
        }
    }

    config.settings = merger.reverse_split(&native.settings, &profiles);
    config.profiles = profiles;
    config
}

pub fn export_target(
    ctx: &Context,
    config: &TargetConfiguration,
    project: &mut NativeProject,
) -> BuildConfiguration {
    let settings = ctx.settings().forward_merge(&config.profiles, &config.settings);
    let mut native = BuildConfiguration::new(&config.name, settings);
    native.base_configuration = attach_source(ctx, config.source_file_path.as_deref(), project);
    native
}

/// Every project-level configuration
pub fn import_list(ctx: &Context, project: &NativeProject) -> Vec<Configuration> {
    project
        .configurations
        .iter()
        .map(|native| import_project(ctx, native, project))
        .collect()
}

/// Replace the project's configurations with the declared ones
pub fn export_list(ctx: &Context, configurations: &[Configuration], project: &mut NativeProject) {
    project.clear_configurations();
    for config in configurations {
        let native = export_project(ctx, config, project);
        project.configurations.push(native);
    }
}

/// Every configuration of a native target
pub fn import_target_list(
    ctx: &Context,
    project: &NativeProject,
    configurations: &[BuildConfiguration],
    product_profile: Option<&str>,
) -> Vec<TargetConfiguration> {
    configurations
        .iter()
        .map(|native| import_target(ctx, native, project, product_profile))
        .collect()
}

/// Configurations of one target. A target declaring none gets one empty
/// configuration per project configuration.
pub fn export_target_list(
    ctx: &Context,
    target: &Target,
    project: &mut NativeProject,
) -> Result<Vec<BuildConfiguration>> {
    let declared: Vec<TargetConfiguration> = if target.configurations.is_empty() {
        project
            .configurations
            .iter()
            .map(|c| TargetConfiguration::new(&c.name, Vec::new()))
            .collect()
    } else {
        target.configurations.clone()
    };

    if declared.is_empty() {
        return Err(Error::MissingField {
            entity: "target".to_string(),
            name: target.name.clone(),
            field: "configurations".to_string(),
        });
    }

    Ok(declared
        .iter()
        .map(|config| export_target(ctx, config, project))
        .collect())
}

fn source_path(native: &BuildConfiguration, project: &NativeProject) -> Option<PathBuf> {
    native
        .base_configuration
        .map(|id| project.file(id).path.clone())
}

/// Reference the external settings file when it exists. Its contents are
/// applied by the IDE, never merged here.
fn attach_source(ctx: &Context, path: Option<&Path>, project: &mut NativeProject) -> Option<FileId> {
    let path = path?;
    if !ctx.resolve(path).is_file() {
        ctx.diagnostics.warn(format!(
            "Settings file {} does not exist, not attaching it",
            path.display()
        ));
        return None;
    }
    if let Some(existing) = project.find_file(path, SourceTree::Project) {
        return Some(existing);
    }
    let group = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => project.group_for_directory(parent),
        _ => project.main_group(),
    };
    Some(project.add_file(group, path.to_path_buf(), SourceTree::Project))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::testing::{settings, Fixture};
    use crate::spec::Settings;
    use serde_yaml::Value;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_export_project_configuration_merges_profiles() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("."));
        let mut project = NativeProject::new();

        let mut config = Configuration::new("Debug", ConfigurationType::Debug);
        config.overrides = settings(&[("SWIFT_VERSION", "5.0")]);
        let native = export_project(&ctx, &config, &mut project);

        assert_eq!(native.name, "Debug");
        assert_eq!(native.settings["SDKROOT"], Value::from("iphoneos"));
        assert_eq!(native.settings["SWIFT_VERSION"], Value::from("5.0"));
        assert!(native.base_configuration.is_none());
    }

    #[test]
    fn test_import_project_configuration_splits_overrides() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("."));
        let mut project = NativeProject::new();

        let mut config = Configuration::new("Release", ConfigurationType::Release);
        config.overrides = settings(&[("SWIFT_VERSION", "5.0")]);
        let native = export_project(&ctx, &config, &mut project);

        let imported = import_project(&ctx, &native, &project);
        assert_eq!(imported, config);
    }

    #[test]
    fn test_missing_settings_file_is_reported() {
        let fixture = Fixture::new();
        let temp_dir = TempDir::new().unwrap();
        let ctx = fixture.context(temp_dir.path());
        let mut project = NativeProject::new();

        let mut config = Configuration::new("Debug", ConfigurationType::Debug);
        config.source_file_path = Some(PathBuf::from("Config/Missing.xcconfig"));
        let native = export_project(&ctx, &config, &mut project);

        assert!(native.base_configuration.is_none());
        assert_eq!(fixture.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_existing_settings_file_is_attached_not_merged() {
        let fixture = Fixture::new();
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("Config")).unwrap();
        fs::write(temp_dir.path().join("Config/App.xcconfig"), "FROM_FILE = YES\n").unwrap();
        let ctx = fixture.context(temp_dir.path());
        let mut project = NativeProject::new();

        let mut config = TargetConfiguration::new("Debug", vec![]);
        config.source_file_path = Some(PathBuf::from("Config/App.xcconfig"));
        let native = export_target(&ctx, &config, &mut project);

        let file = native.base_configuration.unwrap();
        assert_eq!(project.file(file).path, PathBuf::from("Config/App.xcconfig"));
        assert!(!native.settings.contains_key("FROM_FILE"));

        let imported = import_target(&ctx, &native, &project, None);
        assert_eq!(imported.source_file_path, config.source_file_path);
    }

    #[test]
    fn test_import_target_infers_platform_profiles() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("."));
        let project = NativeProject::new();

        let mut native_settings: Settings = ctx
            .settings()
            .resolve_defaults(&["general:debug".to_string(), "ios:debug".to_string()]);
        native_settings.insert("CUSTOM".to_string(), Value::from("1"));
        let native = BuildConfiguration::new("Debug", native_settings);

        let imported = import_target(&ctx, &native, &project, Some("application"));
        assert_eq!(imported.profiles, vec!["general:debug", "ios:debug"]);
        assert_eq!(imported.settings, settings(&[("CUSTOM", "1")]));
    }

    #[test]
    fn test_import_target_keeps_subsumed_product_profile() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("."));
        let project = NativeProject::new();

        let profiles = vec![
            "general:debug".to_string(),
            "ios:debug".to_string(),
            "app-extension".to_string(),
        ];
        let native = BuildConfiguration::new("Debug", ctx.settings().resolve_defaults(&profiles));

        let imported = import_target(&ctx, &native, &project, Some("app-extension"));
        assert_eq!(imported.profiles, profiles);
        assert!(imported.settings.is_empty());
    }

    #[test]
    fn test_import_target_without_sdkroot_keeps_all_settings() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("."));
        let project = NativeProject::new();

        let native = BuildConfiguration::new("Debug", settings(&[("A", "1")]));
        let imported = import_target(&ctx, &native, &project, None);

        assert!(imported.profiles.is_empty());
        assert_eq!(imported.settings, settings(&[("A", "1")]));
        assert_eq!(fixture.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_import_target_with_unknown_sdk_ignores_product_profile() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("."));
        let project = NativeProject::new();

        let mut native_settings = ctx.settings().resolve_defaults(&["application".to_string()]);
        native_settings.insert("SDKROOT".to_string(), "driverkit".into());
        let native = BuildConfiguration::new("Debug", native_settings.clone());
        let imported = import_target(&ctx, &native, &project, Some("application"));

        assert!(imported.profiles.is_empty());
        assert_eq!(imported.settings, native_settings);
        assert_eq!(fixture.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_export_target_list_defaults_to_project_configurations() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("."));
        let mut project = NativeProject::new();

        let target = Target::new("App", Some(":application"));
        let exported = export_target_list(&ctx, &target, &mut project).unwrap();
        let names: Vec<_> = exported.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Debug", "Release"]);
    }

    #[test]
    fn test_export_target_list_without_any_configuration_fails() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("."));
        let mut project = NativeProject::new();
        project.clear_configurations();

        let target = Target::new("App", Some(":application"));
        assert!(matches!(
            export_target_list(&ctx, &target, &mut project),
            Err(Error::MissingField { .. })
        ));
    }
}
