//! Resource directories of a target.
//!
//! Localized content is gathered into variant groups: every file found at
//! `<dir>/<lang>.lproj/<sub-path>` joins the variant group named `<sub-path>`
//! under the group of `<dir>`, one file reference per language.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{compile_globs, push_unique, scan, Package, TargetScope};
use crate::components::Context;
use crate::error::Result;
use crate::native::{BuildItem, BuildPhaseKind, GroupChild, NativeProject, NativeTarget};
use crate::spec::Target;

use super::sources::INFO_PLIST;

pub fn export(
    ctx: &Context,
    target: &Target,
    project: &mut NativeProject,
    scope: &mut TargetScope,
) -> Result<()> {
    let excludes = compile_globs(&target.file_excludes)?;
    for directory in &target.resource_directories {
        for entry in scan(ctx, directory, &excludes)? {
            if entry.package == Some(Package::Localization) {
                export_localization(ctx, &entry.relative, project, scope)?;
                continue;
            }
            if entry.package.is_none()
                && (entry.file_name() == INFO_PLIST || entry.extension() == Some("entitlements"))
            {
                continue;
            }
            let file = scope.cache.reference(project, ctx.base_dir, &entry.relative);
            project
                .target_mut(scope.id)
                .phase_mut(BuildPhaseKind::Resources)
                .add(BuildItem::File(file));
        }
    }
    Ok(())
}

/// Add every file of one `*.lproj` directory to its variant group
fn export_localization(
    ctx: &Context,
    lproj: &Path,
    project: &mut NativeProject,
    scope: &mut TargetScope,
) -> Result<()> {
    let root = ctx.resolve(lproj);
    let parent = lproj.parent().unwrap_or_else(|| Path::new(""));

    for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let Ok(sub_path) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let name = sub_path.to_string_lossy().into_owned();

        let parent_group = if parent.as_os_str().is_empty() {
            project.main_group()
        } else {
            project.group_for_directory(parent)
        };
        let variant = project.variant_group(parent_group, &name);
        let relative = lproj.join(sub_path);
        let file = scope
            .cache
            .reference_in_group(project, ctx.base_dir, &relative, variant);
        if !project.group(variant).children.contains(&GroupChild::File(file)) {
            project.groups[variant.0].children.push(GroupChild::File(file));
        }
        project
            .target_mut(scope.id)
            .phase_mut(BuildPhaseKind::Resources)
            .add(BuildItem::VariantGroup(variant));
    }
    Ok(())
}

/// Directories holding the `*.lproj` folders behind the target's variant
/// groups
pub fn import(project: &NativeProject, native: &NativeTarget) -> Vec<PathBuf> {
    let mut directories = Vec::new();
    let Some(phase) = native.phase(&BuildPhaseKind::Resources) else {
        return directories;
    };
    for build_file in &phase.files {
        let BuildItem::VariantGroup(group) = build_file.item else {
            continue;
        };
        for file in project.group_files(group) {
            if let Some(directory) = localization_parent(&project.file(file).path) {
                push_unique(&mut directories, directory);
            }
        }
    }
    directories
}

/// Parent of the nearest `*.lproj` ancestor of a path
fn localization_parent(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|a| a.extension().is_some_and(|e| e == "lproj"))
        .map(|lproj| lproj.parent().map(Path::to_path_buf).unwrap_or_default())
}
