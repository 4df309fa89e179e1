//! Variant expansion: one independent specification per selected variant.
//!
//! Every expanded project starts from a full copy of the base targets and
//! configurations. A variant target then overlays the base target of the same
//! name:
//!
//! - directory, exclude, option, reference and script lists are unioned
//!   (base entries first, equal entries kept once)
//! - configuration settings are merged key-wise, the variant winning
//! - variant profiles are put in front of the base profiles
//! - a variant settings file replaces the base one
//!
//! A variant without a base target of that name has nothing to overlay and is
//! dropped with a warning.

use log::debug;

use super::target::push_unique;
use crate::diagnostics::Diagnostics;
use crate::spec::{
    Specification, Target, TargetConfiguration, Variant, BASE_VARIANT, DEFAULT_PROJECT_NAME,
};

/// A concrete project produced from the base specification
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedProject {
    pub name: String,
    pub spec: Specification,
}

/// Name of the project produced for a variant
pub fn project_name(variant: &str) -> &str {
    if variant == BASE_VARIANT {
        DEFAULT_PROJECT_NAME
    } else {
        variant
    }
}

/// Expand `spec` into one project per selected non-abstract variant. An empty
/// `selection` selects every variant. A specification without variants is a
/// single project.
pub fn expand(diagnostics: &Diagnostics, spec: &Specification, selection: &[String]) -> Vec<ExpandedProject> {
    if spec.variants.is_empty() {
        let mut base = spec.clone();
        base.variants.clear();
        return vec![ExpandedProject {
            name: DEFAULT_PROJECT_NAME.to_string(),
            spec: base,
        }];
    }

    for name in selection {
        if !spec.variants.iter().any(|v| &v.name == name) {
            diagnostics.warn(format!("Variant '{}' is not declared, ignoring it", name));
        }
    }

    spec.variants
        .iter()
        .filter(|v| !v.is_abstract)
        .filter(|v| selection.is_empty() || selection.contains(&v.name))
        .map(|variant| ExpandedProject {
            name: project_name(&variant.name).to_string(),
            spec: apply(diagnostics, spec, variant),
        })
        .collect()
}

/// Base specification with one variant applied
fn apply(diagnostics: &Diagnostics, spec: &Specification, variant: &Variant) -> Specification {
    let mut expanded = spec.clone();
    expanded.variants.clear();

    for overlay_target in &variant.targets {
        let Some(base) = expanded
            .targets
            .iter_mut()
            .find(|t| t.name == overlay_target.name)
        else {
            diagnostics.warn(format!(
                "Variant '{}' overrides unknown target '{}', dropping it",
                variant.name, overlay_target.name
            ));
            continue;
        };
        if let (Some(base_type), Some(overlay_type)) =
            (base.product_type(), overlay_target.product_type())
        {
            if base_type != overlay_type {
                diagnostics.warn(format!(
                    "Variant '{}' declares target '{}' as {} but the base target is {}",
                    variant.name, overlay_target.name, overlay_type, base_type
                ));
            }
        }
        merge_target(base, overlay_target);
        debug!("Applied variant {} to target {}", variant.name, base.name);
    }
    expanded
}

fn union<T: Clone + PartialEq>(base: &mut Vec<T>, overlay: &[T]) {
    for item in overlay {
        push_unique(base, item.clone());
    }
}

fn merge_target(base: &mut Target, overlay: &Target) {
    union(&mut base.source_directories, &overlay.source_directories);
    union(&mut base.resource_directories, &overlay.resource_directories);
    union(&mut base.file_excludes, &overlay.file_excludes);
    union(&mut base.options, &overlay.options);
    union(&mut base.references, &overlay.references);
    union(&mut base.prebuild_scripts, &overlay.prebuild_scripts);
    union(&mut base.postbuild_scripts, &overlay.postbuild_scripts);

    for config in &overlay.configurations {
        match base.configurations.iter_mut().find(|c| c.name == config.name) {
            Some(existing) => merge_configuration(existing, config),
            None => base.configurations.push(config.clone()),
        }
    }
}

fn merge_configuration(base: &mut TargetConfiguration, overlay: &TargetConfiguration) {
    super::settings::overlay(&mut base.settings, &overlay.settings);
    let mut profiles = overlay.profiles.clone();
    profiles.append(&mut base.profiles);
    base.profiles = profiles;
    if overlay.source_file_path.is_some() {
        base.source_file_path = overlay.source_file_path.clone();
    }
}
