//! The whole project: configurations, targets, schemes and metadata.

use std::path::{Path, PathBuf};

use log::{debug, info};
use semver::Version;

use super::{configuration, embeds, schemes, target, variants, Context};
use crate::error::Result;
use crate::native::{JsonNativeStore, NativeProject, NativeScheme, VERSION_ATTRIBUTE};
use crate::spec::{Specification, LATEST_SPEC_VERSION};

/// Attributes carrying specification fields the native model has no place for
pub const PRE_GENERATE_HOOK_ATTRIBUTE: &str = "SpecweavePreGenerateHook";
pub const POST_GENERATE_HOOK_ATTRIBUTE: &str = "SpecweavePostGenerateHook";
pub const DEPENDENCY_MANAGER_ATTRIBUTE: &str = "SpecweaveDependencyManager";

pub const PROJECT_EXTENSION: &str = "xcodeproj";

/// A document produced by a transform, with where it belongs
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Project {
        project: NativeProject,
        path: PathBuf,
    },
    Scheme {
        scheme: NativeScheme,
        /// Path of the project owning the scheme
        project_path: PathBuf,
        name: String,
    },
    Spec {
        spec: Specification,
        path: PathBuf,
    },
}

impl Output {
    pub fn path(&self) -> PathBuf {
        match self {
            Output::Project { path, .. } | Output::Spec { path, .. } => path.clone(),
            Output::Scheme {
                project_path, name, ..
            } => JsonNativeStore::scheme_path(project_path, name),
        }
    }
}

/// Specification for a native project stored at `path`
pub fn import(ctx: &Context, project: &NativeProject, path: &Path) -> Result<Specification> {
    let version = match project.attribute(VERSION_ATTRIBUTE) {
        Some(raw) => Version::parse(raw).unwrap_or_else(|err| {
            debug!("Ignoring version attribute '{}': {}", raw, err);
            LATEST_SPEC_VERSION
        }),
        None => LATEST_SPEC_VERSION,
    };

    let mut spec = Specification::new(version, ctx.base_dir);
    spec.configurations = configuration::import_list(ctx, project);
    spec.targets = project
        .target_ids()
        .map(|id| target::import(ctx, project, id))
        .collect();
    spec.schemes = schemes::import(&ctx.store.open_schemes(path)?, path);
    spec.pre_generate_hook = project.attribute(PRE_GENERATE_HOOK_ATTRIBUTE).map(PathBuf::from);
    spec.post_generate_hook = project.attribute(POST_GENERATE_HOOK_ATTRIBUTE).map(PathBuf::from);
    spec.includes_dependency_manager = project.attribute(DEPENDENCY_MANAGER_ATTRIBUTE) == Some("true");

    info!(
        "Imported {} configurations, {} targets and {} schemes",
        spec.configurations.len(),
        spec.targets.len(),
        spec.schemes.len()
    );
    Ok(spec)
}

/// Native projects and schemes for every selected variant, written under
/// `output_dir` as `<project name>.xcodeproj`
pub fn export(
    ctx: &Context,
    spec: &Specification,
    selection: &[String],
    output_dir: &Path,
) -> Result<Vec<Output>> {
    let mut outputs = Vec::new();
    for expanded in variants::expand(ctx.diagnostics, spec, selection) {
        let path = output_dir.join(format!("{}.{}", expanded.name, PROJECT_EXTENSION));
        let (project, native_schemes) = export_one(ctx, &expanded.spec, &path)?;
        info!(
            "Generated {} with {} targets",
            path.display(),
            project.targets.len()
        );

        outputs.push(Output::Project {
            project,
            path: path.clone(),
        });
        outputs.extend(native_schemes.into_iter().map(|scheme| Output::Scheme {
            name: scheme.name.clone(),
            scheme,
            project_path: path.clone(),
        }));
    }
    Ok(outputs)
}

fn export_one(
    ctx: &Context,
    spec: &Specification,
    path: &Path,
) -> Result<(NativeProject, Vec<NativeScheme>)> {
    let mut project = NativeProject::new();
    project.set_attribute(VERSION_ATTRIBUTE, spec.version.to_string());
    if let Some(hook) = &spec.pre_generate_hook {
        project.set_attribute(PRE_GENERATE_HOOK_ATTRIBUTE, hook.display().to_string());
    }
    if let Some(hook) = &spec.post_generate_hook {
        project.set_attribute(POST_GENERATE_HOOK_ATTRIBUTE, hook.display().to_string());
    }
    if spec.includes_dependency_manager {
        project.set_attribute(DEPENDENCY_MANAGER_ATTRIBUTE, "true");
    }

    configuration::export_list(ctx, &spec.configurations, &mut project);

    let mut scopes = spec
        .targets
        .iter()
        .map(|t| target::export_shell(t, &mut project))
        .collect::<Result<Vec<_>>>()?;
    for (t, scope) in spec.targets.iter().zip(scopes.iter_mut()) {
        target::export_facets(ctx, t, &mut project, scope)?;
    }
    embeds::export(&spec.targets, &project, &mut scopes);
    for (t, scope) in spec.targets.iter().zip(scopes.iter_mut()) {
        target::export_finish(t, &mut project, scope);
    }

    let native_schemes = schemes::export(ctx, &spec.schemes, &project, path)?;
    Ok((project, native_schemes))
}
