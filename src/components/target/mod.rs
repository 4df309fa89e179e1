//! # Target Transformation
//!
//! One target is converted facet by facet:
//!
//! - [`metadata`]: identity, product type and the native target shell
//! - configurations, through [`super::configuration`]
//! - [`sources`] and [`resources`]: files found under the target's directories
//! - [`references`]: frameworks, libraries, sub-projects and other targets
//! - [`scripts`]: pre- and post-build run-script phases
//!
//! Export is split in two so that every target has a shell (and a product
//! reference) before any target's references are resolved. The per-target
//! state shared by the facets lives in a [`TargetScope`].

pub mod metadata;
pub mod references;
pub mod resources;
pub mod scripts;
pub mod sources;

use std::path::{Path, PathBuf};

use glob::Pattern;
use log::debug;
use walkdir::WalkDir;

use super::configuration;
use super::embeds::EmbedPhases;
use super::source_cache::SourceReferenceCache;
use super::Context;
use crate::error::{Error, Result};
use crate::native::{NativeProject, TargetId};
use crate::spec::Target;

/// State of one target's export
#[derive(Debug)]
pub struct TargetScope {
    pub id: TargetId,
    pub cache: SourceReferenceCache,
    pub embeds: EmbedPhases,
}

impl TargetScope {
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            cache: SourceReferenceCache::new(),
            embeds: EmbedPhases::new(),
        }
    }
}

/// Native target shell for a specification target
pub fn export_shell(target: &Target, project: &mut NativeProject) -> Result<TargetScope> {
    let id = metadata::export(target, project)?;
    Ok(TargetScope::new(id))
}

/// Configurations, sources, resources and references of a target whose shell
/// already exists
pub fn export_facets(
    ctx: &Context,
    target: &Target,
    project: &mut NativeProject,
    scope: &mut TargetScope,
) -> Result<()> {
    let configurations = configuration::export_target_list(ctx, target, project)?;
    project.target_mut(scope.id).configurations = configurations;

    sources::export(ctx, target, project, scope)?;
    resources::export(ctx, target, project, scope)?;
    references::export(ctx, target, project, scope);
    debug!(
        "Exported target {} ({} file references)",
        target.name,
        scope.cache.len()
    );
    Ok(())
}

/// Install the embed phases, then wrap everything in the script phases
pub fn export_finish(target: &Target, project: &mut NativeProject, scope: &mut TargetScope) {
    let native = project.target_mut(scope.id);
    scope.embeds.install(native);
    scripts::export(target, native);
}

/// Specification target for a native target
pub fn import(ctx: &Context, project: &NativeProject, id: TargetId) -> Target {
    let native = project.target(id);
    let mut target = metadata::import(native);
    debug!(
        "Importing target {} ({})",
        target.name,
        metadata::platform(native).unwrap_or("unknown platform")
    );

    let product_profile = target.raw_type().map(str::to_string);
    target.configurations = configuration::import_target_list(
        ctx,
        project,
        &native.configurations,
        product_profile.as_deref(),
    );
    target.source_directories = sources::import(project, native);
    target.options = sources::import_options(project, native);
    target.resource_directories = resources::import(project, native);
    target.references = references::import(project, id);

    let (prebuild, postbuild) = scripts::import(native);
    target.prebuild_scripts = prebuild;
    target.postbuild_scripts = postbuild;
    target
}

/// Directory kinds handled as a unit instead of being descended into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Package {
    AssetCatalog,
    Bundle,
    DataModel,
    Framework,
    Localization,
}

impl Package {
    fn for_directory(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("xcassets") => Some(Package::AssetCatalog),
            Some("bundle") => Some(Package::Bundle),
            Some("xcdatamodeld") => Some(Package::DataModel),
            Some("framework") => Some(Package::Framework),
            Some("lproj") => Some(Package::Localization),
            _ => None,
        }
    }
}

/// Something found under a target directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedEntry {
    /// Path relative to the project base directory
    pub relative: PathBuf,
    /// Path relative to the scanned directory
    pub inner: PathBuf,
    /// Set for directories taken as a whole
    pub package: Option<Package>,
}

impl ScannedEntry {
    pub fn file_name(&self) -> &str {
        self.relative
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    pub fn extension(&self) -> Option<&str> {
        self.relative.extension().and_then(|e| e.to_str())
    }
}

pub fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(Error::Glob))
        .collect()
}

fn is_excluded(excludes: &[Pattern], relative: &Path) -> bool {
    excludes.iter().any(|p| p.matches_path(relative))
}

/// Regular files and packages under `directory` (relative to the base
/// directory), sorted by path. Hidden and excluded entries are left out. A
/// missing directory is reported and yields nothing.
pub fn scan(ctx: &Context, directory: &Path, excludes: &[Pattern]) -> Result<Vec<ScannedEntry>> {
    let root = ctx.resolve(directory);
    if !root.is_dir() {
        ctx.diagnostics.warn(format!(
            "Directory {} does not exist, skipping it",
            directory.display()
        ));
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    let mut walker = WalkDir::new(&root).min_depth(1).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry?;
        let is_dir = entry.file_type().is_dir();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let relative = ctx.relative(entry.path());

        if hidden || is_excluded(excludes, &relative) {
            if is_dir {
                walker.skip_current_dir();
            }
            continue;
        }

        let package = if is_dir {
            match Package::for_directory(entry.path()) {
                Some(package) => {
                    walker.skip_current_dir();
                    Some(package)
                }
                None => continue,
            }
        } else {
            None
        };

        let inner = entry
            .path()
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| relative.clone());
        entries.push(ScannedEntry {
            relative,
            inner,
            package,
        });
    }
    Ok(entries)
}

/// First component of a project-relative path, when it has a directory
pub(crate) fn top_level_directory(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    let first = components.next()?;
    components.next()?;
    Some(PathBuf::from(first.as_os_str()))
}

pub(crate) fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
