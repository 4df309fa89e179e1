//! Frameworks, libraries, sub-projects and other targets a target links
//! against or depends on.

use std::path::{Path, PathBuf};

use log::debug;
use serde_yaml::Value;

use super::TargetScope;
use crate::components::embeds::{
    EmbedRole, CODE_SIGN_ON_COPY, EMBED_FRAMEWORKS_PHASE, REMOVE_HEADERS_ON_COPY,
};
use crate::components::Context;
use crate::native::constants::is_framework;
use crate::native::{
    BuildItem, BuildPhaseKind, FileId, NativeProject, NativeTarget, RemoteProduct, SourceTree,
    TargetId,
};
use crate::spec::{Reference, ReferenceSettings, Target};

pub const FRAMEWORK_SEARCH_PATHS: &str = "FRAMEWORK_SEARCH_PATHS";
pub const LIBRARY_SEARCH_PATHS: &str = "LIBRARY_SEARCH_PATHS";

const INHERITED: &str = "$(inherited)";
const SYSTEM_FRAMEWORKS_DIR: &str = "System/Library/Frameworks";
const SYSTEM_LIBRARIES_DIR: &str = "usr/lib";

/// Linked by default, never added explicitly
const IMPLICIT_FRAMEWORK: &str = "Foundation";

/// Append `$(PROJECT_DIR)/<directory>` to a search-path setting of every
/// configuration of the target, once
pub fn add_search_path(native: &mut NativeTarget, key: &str, directory: Option<&Path>) {
    let entry = match directory {
        Some(dir) if !dir.as_os_str().is_empty() => format!("$(PROJECT_DIR)/{}", dir.display()),
        _ => "$(PROJECT_DIR)".to_string(),
    };

    for config in &mut native.configurations {
        let mut paths: Vec<String> = match config.settings.get(key) {
            Some(Value::Sequence(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(value)) => value.split_whitespace().map(str::to_string).collect(),
            _ => vec![INHERITED.to_string()],
        };
        if paths.contains(&entry) {
            continue;
        }
        paths.push(entry.clone());
        config.settings.insert(
            key.to_string(),
            Value::Sequence(paths.into_iter().map(Value::String).collect()),
        );
    }
}

fn sdk_file(project: &mut NativeProject, path: PathBuf) -> FileId {
    match project.find_file(&path, SourceTree::SdkRoot) {
        Some(id) => id,
        None => {
            let group = project.frameworks_group();
            project.add_file(group, path, SourceTree::SdkRoot)
        }
    }
}

fn link(project: &mut NativeProject, scope: &TargetScope, item: BuildItem) {
    project
        .target_mut(scope.id)
        .phase_mut(BuildPhaseKind::Frameworks)
        .add(item);
}

fn embed(scope: &mut TargetScope, item: BuildItem, settings: &ReferenceSettings) {
    if !settings.copy {
        return;
    }
    let build_file = scope.embeds.add(EmbedRole::Frameworks, item);
    if settings.code_sign_on_copy {
        build_file.add_attribute(CODE_SIGN_ON_COPY);
    }
    build_file.add_attribute(REMOVE_HEADERS_ON_COPY);
}

pub fn export(ctx: &Context, target: &Target, project: &mut NativeProject, scope: &mut TargetScope) {
    for reference in &target.references {
        match reference {
            Reference::SystemFramework { name } => {
                if name == IMPLICIT_FRAMEWORK {
                    continue;
                }
                let path = Path::new(SYSTEM_FRAMEWORKS_DIR).join(format!("{}.framework", name));
                let file = sdk_file(project, path);
                link(project, scope, BuildItem::File(file));
            }
            Reference::SystemLibrary { name } => {
                let file = sdk_file(project, Path::new(SYSTEM_LIBRARIES_DIR).join(name));
                link(project, scope, BuildItem::File(file));
            }
            Reference::LocalFramework { path, settings } => {
                let file = scope.cache.reference(project, ctx.base_dir, path);
                link(project, scope, BuildItem::File(file));
                embed(scope, BuildItem::File(file), settings);
                add_search_path(project.target_mut(scope.id), FRAMEWORK_SEARCH_PATHS, path.parent());
            }
            Reference::LocalLibrary { path, settings } => {
                let file = scope.cache.reference(project, ctx.base_dir, path);
                link(project, scope, BuildItem::File(file));
                if path.extension().is_some_and(|e| e != "a") {
                    embed(scope, BuildItem::File(file), settings);
                }
                add_search_path(project.target_mut(scope.id), LIBRARY_SEARCH_PATHS, path.parent());
            }
            Reference::SubprojectFramework {
                project: subproject,
                name,
                settings,
            } => export_subproject(ctx, subproject, name, settings, project, scope),
            Reference::Target { name, settings } => {
                let Some(dependency) = project.target_by_name(name) else {
                    ctx.diagnostics.warn(format!(
                        "Target '{}' referenced by '{}' does not exist, skipping it",
                        name, target.name
                    ));
                    continue;
                };
                project.target_mut(scope.id).add_dependency(dependency);
                if is_framework(&project.target(dependency).product_type) {
                    link(project, scope, BuildItem::Product(dependency));
                    embed(scope, BuildItem::Product(dependency), settings);
                }
            }
        }
    }
}

fn export_subproject(
    ctx: &Context,
    subproject: &Path,
    name: &str,
    settings: &ReferenceSettings,
    project: &mut NativeProject,
    scope: &mut TargetScope,
) {
    let other = match ctx.store.open(&ctx.resolve(subproject)) {
        Ok(other) => other,
        Err(err) => {
            ctx.diagnostics.warn(format!(
                "Could not open sub-project {}: {}",
                subproject.display(),
                err
            ));
            return;
        }
    };

    let product_name = format!("{}.framework", name);
    let Some(remote) = other
        .targets
        .iter()
        .find(|t| t.product_name == product_name && is_framework(&t.product_type))
    else {
        debug!(
            "No framework target producing {} in {}",
            product_name,
            subproject.display()
        );
        return;
    };

    project.add_subproject(subproject);
    let item = BuildItem::Remote(RemoteProduct {
        project: subproject.to_path_buf(),
        target_name: remote.name.clone(),
        product_name,
    });
    link(project, scope, item.clone());
    embed(scope, item, settings);
}

/// Settings recovered from the target's "Embed Frameworks" phase
fn embed_settings(native: &NativeTarget, item: &BuildItem) -> ReferenceSettings {
    let embedded = native
        .phase_named(EMBED_FRAMEWORKS_PHASE)
        .and_then(|phase| phase.files.iter().find(|f| &f.item == item));
    match embedded {
        Some(build_file) => ReferenceSettings {
            copy: true,
            code_sign_on_copy: build_file.attributes.iter().any(|a| a == CODE_SIGN_ON_COPY),
        },
        None => ReferenceSettings::link_only(),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn import(project: &NativeProject, id: TargetId) -> Vec<Reference> {
    let native = project.target(id);
    let mut references = Vec::new();

    if let Some(phase) = native.phase(&BuildPhaseKind::Frameworks) {
        for build_file in &phase.files {
            let settings = embed_settings(native, &build_file.item);
            let reference = match &build_file.item {
                BuildItem::File(file) => {
                    let file = project.file(*file);
                    let framework = file.extension() == Some("framework");
                    match file.source_tree {
                        SourceTree::SdkRoot if framework => Reference::SystemFramework {
                            name: file_stem(&file.path),
                        },
                        SourceTree::SdkRoot => Reference::SystemLibrary {
                            name: file_name(&file.path),
                        },
                        SourceTree::BuiltProducts => {
                            let owner = project.targets.iter().find(|t| {
                                project.file(t.product).path == file.path
                            });
                            match owner {
                                Some(owner) => Reference::Target {
                                    name: owner.name.clone(),
                                    settings,
                                },
                                None => continue,
                            }
                        }
                        SourceTree::Project | SourceTree::Absolute if framework => {
                            Reference::LocalFramework {
                                path: file.path.clone(),
                                settings,
                            }
                        }
                        SourceTree::Project | SourceTree::Absolute => Reference::LocalLibrary {
                            path: file.path.clone(),
                            settings,
                        },
                    }
                }
                BuildItem::Product(other) => Reference::Target {
                    name: project.target(*other).name.clone(),
                    settings,
                },
                BuildItem::Remote(remote) => Reference::SubprojectFramework {
                    project: remote.project.clone(),
                    name: file_stem(Path::new(&remote.product_name)),
                    settings,
                },
                BuildItem::VariantGroup(_) => continue,
            };
            if !references.contains(&reference) {
                references.push(reference);
            }
        }
    }

    for dependency in &native.dependencies {
        let name = &project.target(*dependency).name;
        let linked = references
            .iter()
            .any(|r| matches!(r, Reference::Target { name: n, .. } if n == name));
        if !linked {
            references.push(Reference::Target {
                name: name.clone(),
                settings: ReferenceSettings::default(),
            });
        }
    }
    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::embeds::EmbedPhases;
    use crate::components::target::export_shell;
    use crate::components::testing::{settings, Fixture};
    use crate::native::BuildConfiguration;

    fn shell(project: &mut NativeProject, target: &Target) -> TargetScope {
        let mut scope = export_shell(target, project).unwrap();
        project.target_mut(scope.id).configurations =
            vec![BuildConfiguration::new("Debug", settings(&[]))];
        scope.embeds = EmbedPhases::new();
        scope
    }

    fn finish(project: &mut NativeProject, scope: &mut TargetScope) {
        scope.embeds.install(project.target_mut(scope.id));
    }

    #[test]
    fn test_add_search_path_once() {
        let mut project = NativeProject::new();
        let id = project.add_target("App", crate::native::constants::APPLICATION);
        let native = project.target_mut(id);
        native.configurations = vec![BuildConfiguration::new("Debug", settings(&[]))];

        add_search_path(native, FRAMEWORK_SEARCH_PATHS, Some(Path::new("Vendor")));
        add_search_path(native, FRAMEWORK_SEARCH_PATHS, Some(Path::new("Vendor")));

        let value = &native.configurations[0].settings[FRAMEWORK_SEARCH_PATHS];
        let expected: Value = serde_yaml::from_str("['$(inherited)', '$(PROJECT_DIR)/Vendor']").unwrap();
        assert_eq!(value, &expected);
    }

    #[test]
    fn test_system_references_skip_foundation() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("/work"));
        let mut project = NativeProject::new();
        let mut target = Target::new("App", Some(":application"));
        target.references = vec![
            Reference::SystemFramework {
                name: "Foundation".to_string(),
            },
            Reference::SystemFramework {
                name: "UIKit".to_string(),
            },
            Reference::SystemLibrary {
                name: "libz.tbd".to_string(),
            },
        ];
        let mut scope = shell(&mut project, &target);
        export(&ctx, &target, &mut project, &mut scope);

        let frameworks = project
            .target(scope.id)
            .phase(&BuildPhaseKind::Frameworks)
            .unwrap();
        assert_eq!(frameworks.files.len(), 2);
        assert!(project
            .find_file(
                Path::new("System/Library/Frameworks/UIKit.framework"),
                SourceTree::SdkRoot
            )
            .is_some());

        let imported = import(&project, scope.id);
        assert_eq!(imported, target.references[1..].to_vec());
    }

    #[test]
    fn test_local_framework_is_embedded_and_searchable() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("/work"));
        let mut project = NativeProject::new();
        let mut target = Target::new("App", Some(":application"));
        target.references = vec![
            Reference::LocalFramework {
                path: PathBuf::from("Vendor/Kit.framework"),
                settings: ReferenceSettings::default(),
            },
            Reference::LocalLibrary {
                path: PathBuf::from("Vendor/libcore.a"),
                settings: ReferenceSettings::default(),
            },
        ];
        let mut scope = shell(&mut project, &target);
        export(&ctx, &target, &mut project, &mut scope);

        let embedded = scope.embeds.phase(EmbedRole::Frameworks).unwrap();
        assert_eq!(embedded.files.len(), 1);
        assert_eq!(
            embedded.files[0].attributes,
            vec![CODE_SIGN_ON_COPY.to_string(), REMOVE_HEADERS_ON_COPY.to_string()]
        );
        finish(&mut project, &mut scope);

        let config = &project.target(scope.id).configurations[0];
        assert!(config.settings.contains_key(FRAMEWORK_SEARCH_PATHS));
        assert!(config.settings.contains_key(LIBRARY_SEARCH_PATHS));

        let imported = import(&project, scope.id);
        assert_eq!(
            imported,
            vec![
                Reference::LocalFramework {
                    path: PathBuf::from("Vendor/Kit.framework"),
                    settings: ReferenceSettings::default(),
                },
                Reference::LocalLibrary {
                    path: PathBuf::from("Vendor/libcore.a"),
                    settings: ReferenceSettings::link_only(),
                },
            ]
        );
    }

    #[test]
    fn test_target_references_link_frameworks_only() {
        let fixture = Fixture::new();
        let ctx = fixture.context(Path::new("/work"));
        let mut project = NativeProject::new();
        let kit = Target::new("Kit", Some(":framework"));
        let ext = Target::new("Ext", Some(":app-extension"));
        let mut app = Target::new("App", Some(":application"));
        app.references = vec![
            Reference::Target {
                name: "Kit".to_string(),
                settings: ReferenceSettings {
                    copy: true,
                    code_sign_on_copy: false,
                },
            },
            Reference::Target {
                name: "Ext".to_string(),
                settings: ReferenceSettings::default(),
            },
            Reference::Target {
                name: "Missing".to_string(),
                settings: ReferenceSettings::default(),
            },
        ];
        export_shell(&kit, &mut project).unwrap();
        export_shell(&ext, &mut project).unwrap();
        let mut scope = shell(&mut project, &app);
        export(&ctx, &app, &mut project, &mut scope);
        finish(&mut project, &mut scope);

        let native = project.target(scope.id);
        assert_eq!(native.dependencies.len(), 2);
        assert_eq!(
            native.phase(&BuildPhaseKind::Frameworks).unwrap().files.len(),
            1
        );
        assert_eq!(fixture.diagnostics.warning_count(), 1);

        let imported = import(&project, scope.id);
        assert_eq!(imported, app.references[..2].to_vec());
    }

    #[test]
    fn test_subproject_framework_resolves_remote_product() {
        let fixture = Fixture::new();
        let mut vendor = NativeProject::new();
        vendor.add_target("Vendor", crate::native::constants::FRAMEWORK);
        vendor.add_target("VendorApp", crate::native::constants::APPLICATION);
        fixture
            .store
            .insert(Path::new("/work/Vendor/Vendor.xcodeproj"), vendor);
        let ctx = fixture.context(Path::new("/work"));

        let mut project = NativeProject::new();
        let mut target = Target::new("App", Some(":application"));
        target.references = vec![
            Reference::SubprojectFramework {
                project: PathBuf::from("Vendor/Vendor.xcodeproj"),
                name: "Vendor".to_string(),
                settings: ReferenceSettings::default(),
            },
            Reference::SubprojectFramework {
                project: PathBuf::from("Vendor/Vendor.xcodeproj"),
                name: "VendorApp".to_string(),
                settings: ReferenceSettings::default(),
            },
            Reference::SubprojectFramework {
                project: PathBuf::from("Missing.xcodeproj"),
                name: "Gone".to_string(),
                settings: ReferenceSettings::default(),
            },
        ];
        let mut scope = shell(&mut project, &target);
        export(&ctx, &target, &mut project, &mut scope);
        finish(&mut project, &mut scope);

        assert_eq!(project.subprojects, vec![PathBuf::from("Vendor/Vendor.xcodeproj")]);
        assert_eq!(fixture.diagnostics.warning_count(), 1);
        assert!(fixture.store.project(Path::new("/work/Vendor/Vendor.xcodeproj")).is_some());
        assert_eq!(import(&project, scope.id), target.references[..1].to_vec());
    }
}
