//! Settings merge between profiles and explicit overrides.
//!
//! Forward (export): resolve the profiles in order, later keys replacing
//! earlier ones, then lay the explicit overrides on top.
//!
//! Reverse (import): drop every native key whose value is exactly what the
//! profiles alone would produce; what is left are the overrides. A key whose
//! override happens to equal the profile default is therefore lost on import.

use serde_yaml::Value;

use crate::diagnostics::Diagnostics;
use crate::profiles::ProfileStore;
use crate::spec::{ConfigurationType, Settings};

/// Build setting naming the platform SDK
pub const SDKROOT: &str = "SDKROOT";

pub struct SettingsMerger<'a> {
    profiles: &'a dyn ProfileStore,
    diagnostics: &'a Diagnostics,
}

impl<'a> SettingsMerger<'a> {
    pub fn new(profiles: &'a dyn ProfileStore, diagnostics: &'a Diagnostics) -> Self {
        Self {
            profiles,
            diagnostics,
        }
    }

    /// Fold the named profiles into one bundle. Unknown profiles contribute
    /// nothing and are reported.
    pub fn resolve_defaults(&self, profiles: &[String]) -> Settings {
        let mut resolved = Settings::new();
        for name in profiles {
            match self.profiles.lookup(name) {
                Some(settings) => overlay(&mut resolved, &settings),
                None => self
                    .diagnostics
                    .warn(format!("Unknown settings profile '{}', skipping it", name)),
            }
        }
        resolved
    }

    pub fn forward_merge(&self, profiles: &[String], overrides: &Settings) -> Settings {
        merge(&self.resolve_defaults(profiles), overrides)
    }

    pub fn reverse_split(&self, native: &Settings, profiles: &[String]) -> Settings {
        split(native, &self.resolve_defaults(profiles))
    }

    /// Whether every key of a known profile is present, with the same value,
    /// in `native`
    pub fn is_subsumed(&self, profile: &str, native: &Settings) -> bool {
        if !self.profiles.contains(profile) {
            return false;
        }
        self.profiles
            .lookup(profile)
            .is_some_and(|settings| settings.iter().all(|(k, v)| native.get(k) == Some(v)))
    }
}

/// Copy every key of `layer` into `base`, replacing existing values
pub fn overlay(base: &mut Settings, layer: &Settings) {
    for (key, value) in layer {
        base.insert(key.clone(), value.clone());
    }
}

/// `defaults` with `overrides` laid on top
pub fn merge(defaults: &Settings, overrides: &Settings) -> Settings {
    let mut merged = defaults.clone();
    overlay(&mut merged, overrides);
    merged
}

/// Keys of `native` not reproduced exactly by `defaults`
pub fn split(native: &Settings, defaults: &Settings) -> Settings {
    native
        .iter()
        .filter(|(key, value)| defaults.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Platform profile namespace for an SDK root value
pub fn platform_for_sdk(sdkroot: &str) -> Option<&'static str> {
    const PLATFORMS: &[(&str, &str)] = &[
        ("iphoneos", "ios"),
        ("macosx", "mac"),
        ("appletvos", "tv"),
        ("watchos", "watch"),
    ];
    PLATFORMS
        .iter()
        .find(|(sdk, _)| sdkroot.contains(sdk))
        .map(|(_, platform)| *platform)
}

/// String value of a setting, if it is a scalar string
pub fn string_value<'s>(settings: &'s Settings, key: &str) -> Option<&'s str> {
    settings.get(key).and_then(Value::as_str)
}

/// Profiles a native configuration was most likely generated from, inferred
/// from its `SDKROOT`. `None` when the platform cannot be told.
pub fn infer_profiles(
    settings: &Settings,
    config_type: ConfigurationType,
    diagnostics: &Diagnostics,
) -> Option<Vec<String>> {
    let Some(sdkroot) = string_value(settings, SDKROOT) else {
        diagnostics.warn(format!(
            "Configuration has no {}, importing its settings without profiles",
            SDKROOT
        ));
        return None;
    };
    match platform_for_sdk(sdkroot) {
        Some(platform) => Some(vec![
            format!("general:{}", config_type.as_str()),
            format!("{}:{}", platform, config_type.as_str()),
        ]),
        None => {
            diagnostics.warn(format!(
                "Unrecognized {} '{}', importing its settings without profiles",
                SDKROOT, sdkroot
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::testing::settings;
    use crate::profiles::MemoryProfileStore;

    fn store() -> MemoryProfileStore {
        MemoryProfileStore::new()
            .with("A", settings(&[("X", "1"), ("Y", "2")]))
            .with("B", settings(&[("Y", "3")]))
    }

    #[test]
    fn test_forward_merge_precedence() {
        let profiles = store();
        let diagnostics = Diagnostics::new();
        let merger = SettingsMerger::new(&profiles, &diagnostics);

        let merged = merger.forward_merge(
            &["A".to_string(), "B".to_string()],
            &settings(&[("Y", "5")]),
        );
        assert_eq!(merged, settings(&[("X", "1"), ("Y", "5")]));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_resolve_defaults_later_profile_wins() {
        let profiles = store();
        let diagnostics = Diagnostics::new();
        let merger = SettingsMerger::new(&profiles, &diagnostics);

        let resolved = merger.resolve_defaults(&["A".to_string(), "B".to_string()]);
        assert_eq!(resolved, settings(&[("X", "1"), ("Y", "3")]));
    }

    #[test]
    fn test_unknown_profile_is_reported_and_skipped() {
        let profiles = store();
        let diagnostics = Diagnostics::new();
        let merger = SettingsMerger::new(&profiles, &diagnostics);

        let resolved = merger.resolve_defaults(&["A".to_string(), "ios:nonexistent".to_string()]);
        assert_eq!(resolved, settings(&[("X", "1"), ("Y", "2")]));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.entries()[0].message.contains("ios:nonexistent"));
    }

    #[test]
    fn test_reverse_split_keeps_only_overrides() {
        let profiles = store();
        let diagnostics = Diagnostics::new();
        let merger = SettingsMerger::new(&profiles, &diagnostics);

        let native = settings(&[("X", "1"), ("Y", "5"), ("Z", "9")]);
        let overrides = merger.reverse_split(&native, &["A".to_string(), "B".to_string()]);
        assert_eq!(overrides, settings(&[("Y", "5"), ("Z", "9")]));
    }

    #[test]
    fn test_reverse_split_loses_override_equal_to_default() {
        let defaults = settings(&[("Y", "3")]);
        let native = merge(&defaults, &settings(&[("Y", "3")]));
        assert!(split(&native, &defaults).is_empty());
    }

    #[test]
    fn test_platform_for_sdk() {
        assert_eq!(platform_for_sdk("iphoneos"), Some("ios"));
        assert_eq!(platform_for_sdk("macosx"), Some("mac"));
        assert_eq!(platform_for_sdk("appletvos"), Some("tv"));
        assert_eq!(platform_for_sdk("watchos"), Some("watch"));
        assert_eq!(platform_for_sdk("driverkit"), None);
    }

    #[test]
    fn test_infer_profiles() {
        let diagnostics = Diagnostics::new();
        let inferred = infer_profiles(
            &settings(&[("SDKROOT", "iphoneos")]),
            ConfigurationType::Debug,
            &diagnostics,
        );
        assert_eq!(
            inferred,
            Some(vec!["general:debug".to_string(), "ios:debug".to_string()])
        );
        assert!(diagnostics.is_empty());

        let unknown = infer_profiles(
            &settings(&[("SDKROOT", "driverkit")]),
            ConfigurationType::Release,
            &diagnostics,
        );
        assert_eq!(unknown, None);
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_is_subsumed() {
        let profiles = store();
        let diagnostics = Diagnostics::new();
        let merger = SettingsMerger::new(&profiles, &diagnostics);

        assert!(merger.is_subsumed("B", &settings(&[("Y", "3"), ("Q", "0")])));
        assert!(!merger.is_subsumed("A", &settings(&[("X", "1")])));
        assert!(!merger.is_subsumed("missing", &settings(&[])));
        assert!(diagnostics.is_empty());
    }
}
