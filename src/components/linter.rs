//! Structural warnings over an imported specification.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::target::references::FRAMEWORK_SEARCH_PATHS;
use super::Context;
use crate::spec::{Reference, Specification, Target};

const PROJECT_DIR_VARIABLES: &[&str] = &["$(PROJECT_DIR)", "$(SRCROOT)", "${PROJECT_DIR}", "${SRCROOT}"];

/// Warn about local frameworks no framework search path of their target
/// covers. Returns the number of warnings emitted.
pub fn lint(ctx: &Context, spec: &Specification) -> usize {
    spec.targets.iter().map(|t| lint_target(ctx, t)).sum()
}

fn lint_target(ctx: &Context, target: &Target) -> usize {
    let search_paths = search_paths(ctx, target);
    let mut warnings = 0;
    for reference in &target.references {
        let Reference::LocalFramework { path, .. } = reference else {
            continue;
        };
        let directory = canonical(&ctx.resolve(path.parent().unwrap_or_else(|| Path::new(""))));
        if !search_paths.iter().any(|p| covers(p, &directory)) {
            ctx.diagnostics.warn(format!(
                "Target '{}' links {} but no {} entry covers {}",
                target.name,
                path.display(),
                FRAMEWORK_SEARCH_PATHS,
                directory.display()
            ));
            warnings += 1;
        }
    }
    warnings
}

/// Every framework search path of the target's configurations, resolved
fn search_paths(ctx: &Context, target: &Target) -> Vec<(PathBuf, bool)> {
    let mut paths = Vec::new();
    for config in &target.configurations {
        let values: Vec<String> = match config.settings.get(FRAMEWORK_SEARCH_PATHS) {
            Some(Value::Sequence(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(value)) => value.split_whitespace().map(str::to_string).collect(),
            _ => Vec::new(),
        };
        for value in values {
            if let Some(resolved) = resolve(ctx, &value) {
                paths.push(resolved);
            }
        }
    }
    paths
}

/// Resolved directory of a search-path entry and whether it is recursive
fn resolve(ctx: &Context, value: &str) -> Option<(PathBuf, bool)> {
    let value = value.trim_matches('"');
    if value == "$(inherited)" {
        return None;
    }
    let (value, recursive) = match value.strip_suffix("/**") {
        Some(stripped) => (stripped, true),
        None => (value, false),
    };

    let mut relative = value;
    for variable in PROJECT_DIR_VARIABLES {
        if let Some(rest) = value.strip_prefix(variable) {
            relative = rest.trim_start_matches('/');
            break;
        }
    }
    Some((canonical(&ctx.resolve(Path::new(relative))), recursive))
}

fn covers((path, recursive): &(PathBuf, bool), directory: &Path) -> bool {
    path == directory || (*recursive && directory.starts_with(path))
}

/// Path with symlinks resolved when it exists
fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::testing::Fixture;
    use crate::spec::{ReferenceSettings, TargetConfiguration, LATEST_SPEC_VERSION};
    use tempfile::TempDir;

    fn spec_with(search_paths: &[&str]) -> Specification {
        let mut spec = Specification::new(LATEST_SPEC_VERSION, "/work");
        let mut target = Target::new("App", Some(":application"));
        target.references = vec![Reference::LocalFramework {
            path: PathBuf::from("Vendor/Kit.framework"),
            settings: ReferenceSettings::default(),
        }];
        let mut config = TargetConfiguration::new("Debug", vec![]);
        if !search_paths.is_empty() {
            config.settings.insert(
                FRAMEWORK_SEARCH_PATHS.to_string(),
                Value::Sequence(search_paths.iter().map(|p| Value::from(*p)).collect()),
            );
        }
        target.configurations = vec![config];
        spec.targets = vec![target];
        spec
    }

    #[test]
    fn test_uncovered_framework_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let fixture = Fixture::new();
        let ctx = fixture.context(temp_dir.path());

        assert_eq!(lint(&ctx, &spec_with(&[])), 1);
        assert_eq!(lint(&ctx, &spec_with(&["$(inherited)", "$(PROJECT_DIR)/Other"])), 1);
        assert_eq!(fixture.diagnostics.warning_count(), 2);
    }

    #[test]
    fn test_covered_framework_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("Vendor")).unwrap();
        let fixture = Fixture::new();
        let ctx = fixture.context(temp_dir.path());

        assert_eq!(lint(&ctx, &spec_with(&["$(inherited)", "$(PROJECT_DIR)/Vendor"])), 0);
        assert_eq!(lint(&ctx, &spec_with(&["\"$(SRCROOT)/Vendor\""])), 0);
        assert_eq!(lint(&ctx, &spec_with(&["$(PROJECT_DIR)/**"])), 0);
        assert!(fixture.diagnostics.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_search_path_is_resolved() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("Vendor")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("Vendor"), temp_dir.path().join("Link"))
            .unwrap();
        let fixture = Fixture::new();
        let ctx = fixture.context(temp_dir.path());

        assert_eq!(lint(&ctx, &spec_with(&["$(PROJECT_DIR)/Link"])), 0);
    }
}
