//! Source directories of a target.
//!
//! Every file under the source directories is routed to a build phase by its
//! extension. Directories are walked in reverse declaration order and a file
//! found at the same path inside two directories is taken from the one
//! declared first.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::Pattern;

use super::references;
use super::{compile_globs, push_unique, scan, top_level_directory, Package, ScannedEntry, TargetScope};
use crate::components::embeds::{EmbedRole, CODE_SIGN_ON_COPY, REMOVE_HEADERS_ON_COPY};
use crate::components::Context;
use crate::error::{Error, Result};
use crate::native::constants::{is_compiled_source, is_framework};
use crate::native::{BuildItem, BuildPhaseKind, NativeProject, NativeTarget, SourceTree};
use crate::spec::{FileOption, Target};

pub const INFO_PLIST: &str = "Info.plist";
pub const PUBLIC_HEADER: &str = "Public";

/// Where a file found in a source directory goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Sources,
    PublicHeader,
    Resources,
    Link,
    EmbedFramework,
    /// A file reference that joins no phase
    ReferenceOnly,
    Skip,
}

fn route(entry: &ScannedEntry, framework_target: bool) -> Route {
    match entry.package {
        Some(Package::AssetCatalog) | Some(Package::Bundle) => return Route::Resources,
        Some(Package::DataModel) => return Route::Sources,
        Some(Package::Framework) => return Route::EmbedFramework,
        Some(Package::Localization) => return Route::Skip,
        None => {}
    }
    if entry.file_name() == INFO_PLIST {
        return Route::Skip;
    }
    match entry.extension() {
        Some("entitlements") => Route::Skip,
        Some("a") | Some("dylib") | Some("tbd") => Route::Link,
        Some("h") | Some("hpp") if framework_target => Route::PublicHeader,
        Some("h") | Some("hpp") | Some("xcconfig") => Route::ReferenceOnly,
        Some(ext) if is_compiled_source(ext) => Route::Sources,
        _ => Route::Resources,
    }
}

/// Per-file compiler flags selected by glob
struct FileOptions<'t> {
    options: Vec<(Pattern, &'t str)>,
}

impl<'t> FileOptions<'t> {
    fn new(options: &'t [FileOption]) -> Result<Self> {
        let options = options
            .iter()
            .map(|o| Ok((Pattern::new(&o.glob).map_err(Error::Glob)?, o.flags.as_str())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { options })
    }

    fn flags_for<'s>(&'s self, relative: &'s Path) -> impl Iterator<Item = &'t str> + 's {
        self.options
            .iter()
            .filter(move |(pattern, _)| pattern.matches_path(relative))
            .map(|(_, flags)| *flags)
    }
}

pub fn export(
    ctx: &Context,
    target: &Target,
    project: &mut NativeProject,
    scope: &mut TargetScope,
) -> Result<()> {
    let excludes = compile_globs(&target.file_excludes)?;
    let options = FileOptions::new(&target.options)?;
    let framework_target = is_framework(&project.target(scope.id).product_type);

    let mut chosen: BTreeMap<PathBuf, ScannedEntry> = BTreeMap::new();
    for directory in target.source_directories.iter().rev() {
        for entry in scan(ctx, directory, &excludes)? {
            chosen.insert(entry.inner.clone(), entry);
        }
    }

    for entry in chosen.into_values() {
        let route = route(&entry, framework_target);
        if route == Route::Skip {
            continue;
        }
        let file = scope.cache.reference(project, ctx.base_dir, &entry.relative);
        let item = BuildItem::File(file);
        let native = project.target_mut(scope.id);
        match route {
            Route::Sources => {
                let build_file = native.phase_mut(BuildPhaseKind::Sources).add(item);
                for flags in options.flags_for(&entry.relative) {
                    build_file.append_compiler_flags(flags);
                }
            }
            Route::PublicHeader => {
                native
                    .phase_mut(BuildPhaseKind::Headers)
                    .add(item)
                    .add_attribute(PUBLIC_HEADER);
            }
            Route::Resources => {
                native.phase_mut(BuildPhaseKind::Resources).add(item);
            }
            Route::Link => {
                native.phase_mut(BuildPhaseKind::Frameworks).add(item);
                references::add_search_path(
                    native,
                    references::LIBRARY_SEARCH_PATHS,
                    entry.relative.parent(),
                );
            }
            Route::EmbedFramework => {
                native.phase_mut(BuildPhaseKind::Frameworks).add(item.clone());
                references::add_search_path(
                    native,
                    references::FRAMEWORK_SEARCH_PATHS,
                    entry.relative.parent(),
                );
                let embedded = scope.embeds.add(EmbedRole::Frameworks, item);
                embedded.add_attribute(CODE_SIGN_ON_COPY);
                embedded.add_attribute(REMOVE_HEADERS_ON_COPY);
            }
            Route::ReferenceOnly | Route::Skip => {}
        }
    }
    Ok(())
}

/// Top-level directories of every file built by the target, in order of first
/// appearance
pub fn import(project: &NativeProject, native: &NativeTarget) -> Vec<PathBuf> {
    let mut directories = Vec::new();
    for kind in [
        BuildPhaseKind::Sources,
        BuildPhaseKind::Headers,
        BuildPhaseKind::Resources,
    ] {
        let Some(phase) = native.phase(&kind) else {
            continue;
        };
        for build_file in &phase.files {
            let BuildItem::File(id) = build_file.item else {
                continue;
            };
            let file = project.file(id);
            if file.source_tree != SourceTree::Project {
                continue;
            }
            if let Some(directory) = top_level_directory(&file.path) {
                push_unique(&mut directories, directory);
            }
        }
    }
    directories
}

/// Compiler flags of sources-phase files, one option per file
pub fn import_options(project: &NativeProject, native: &NativeTarget) -> Vec<FileOption> {
    let Some(phase) = native.phase(&BuildPhaseKind::Sources) else {
        return Vec::new();
    };
    phase
        .files
        .iter()
        .filter_map(|build_file| {
            let BuildItem::File(id) = build_file.item else {
                return None;
            };
            let flags = build_file.compiler_flags.as_deref()?;
            Some(FileOption {
                glob: project.file(id).path.to_string_lossy().into_owned(),
                flags: flags.to_string(),
            })
        })
        .collect()
}
