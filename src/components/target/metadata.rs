//! Target identity and product type.

use crate::components::settings::{self, SDKROOT};
use crate::error::{Error, Result};
use crate::native::{BuildPhaseKind, NativeProject, NativeTarget, TargetId};
use crate::spec::target::{expand_product_type, shorten_product_type};
use crate::spec::Target;

/// Create the native shell of a target: its product reference and the
/// sources, resources and frameworks phases every target starts with
pub fn export(target: &Target, project: &mut NativeProject) -> Result<TargetId> {
    let product_type = target
        .target_type
        .as_deref()
        .map(expand_product_type)
        .ok_or_else(|| Error::MissingField {
            entity: "target".to_string(),
            name: target.name.clone(),
            field: "type".to_string(),
        })?;

    let id = project.add_target(&target.name, &product_type);
    let native = project.target_mut(id);
    native.phase_mut(BuildPhaseKind::Sources);
    native.phase_mut(BuildPhaseKind::Resources);
    native.phase_mut(BuildPhaseKind::Frameworks);
    Ok(id)
}

pub fn import(native: &NativeTarget) -> Target {
    Target::new(
        &native.name,
        Some(shorten_product_type(&native.product_type).as_str()),
    )
}

/// Platform of a native target, from the `SDKROOT` of its first configuration
pub fn platform(native: &NativeTarget) -> Option<&'static str> {
    let config = native.configurations.first()?;
    settings::string_value(&config.settings, SDKROOT).and_then(settings::platform_for_sdk)
}
