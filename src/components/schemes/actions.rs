//! One converter per scheme action.

use std::path::Path;

use super::arguments;
use super::SchemeScope;
use crate::error::Result;
use crate::native::scheme::{
    BuildActionEntry, BuildableReference, NativeAnalyzeAction, NativeArchiveAction,
    NativeBuildAction, NativeLaunchAction, NativeProfileAction, NativeTestAction,
    TestableReference,
};
use crate::spec::{
    AnalyzeAction, ArchiveAction, BuildAction, BuildActionTarget, LaunchAction, ProfileAction,
    TestAction, TestTarget,
};

pub fn export_build(scope: &SchemeScope, scheme: &str, action: &BuildAction) -> NativeBuildAction {
    let entries = action
        .targets
        .iter()
        .filter_map(|target| {
            let Some(buildable) = scope.buildable(&target.name) else {
                scope.ctx.diagnostics.warn(format!(
                    "Scheme '{}' builds unknown target '{}', skipping it",
                    scheme, target.name
                ));
                return None;
            };
            Some(BuildActionEntry {
                buildable,
                build_for_archiving: target.archiving_enabled,
                build_for_running: target.running_enabled,
                build_for_profiling: target.profiling_enabled,
                build_for_testing: target.testing_enabled,
                build_for_analyzing: target.analyzing_enabled,
            })
        })
        .collect();
    NativeBuildAction {
        parallelize_buildables: action.parallel,
        build_implicit_dependencies: action.build_implicit,
        entries,
    }
}

pub fn import_build(action: &NativeBuildAction) -> BuildAction {
    BuildAction {
        targets: action
            .entries
            .iter()
            .map(|entry| BuildActionTarget {
                name: entry.buildable.target_name.clone(),
                archiving_enabled: entry.build_for_archiving,
                running_enabled: entry.build_for_running,
                profiling_enabled: entry.build_for_profiling,
                testing_enabled: entry.build_for_testing,
                analyzing_enabled: entry.build_for_analyzing,
            })
            .collect(),
        parallel: action.parallelize_buildables,
        build_implicit: action.build_implicit_dependencies,
    }
}

/// Testable in another native project, opened on demand
fn external_testable(scope: &SchemeScope, scheme: &str, target: &TestTarget, location: &Path) -> Option<BuildableReference> {
    let ctx = &scope.ctx;
    let other = match ctx.store.open(&ctx.resolve(location)) {
        Ok(other) => other,
        Err(err) => {
            ctx.diagnostics.warn(format!(
                "Scheme '{}' cannot open {} for test target '{}': {}",
                scheme,
                location.display(),
                target.name,
                err
            ));
            return None;
        }
    };
    let Some(id) = other.target_by_name(&target.name) else {
        ctx.diagnostics.warn(format!(
            "Scheme '{}' tests unknown target '{}' in {}, skipping it",
            scheme,
            target.name,
            location.display()
        ));
        return None;
    };
    Some(BuildableReference::new(
        &target.name,
        &other.target(id).product_name,
        location,
    ))
}

pub fn export_test(scope: &SchemeScope, scheme: &str, action: &TestAction) -> NativeTestAction {
    let testables = action
        .targets
        .iter()
        .filter_map(|target| {
            let buildable = match &target.location {
                Some(location) => external_testable(scope, scheme, target, location)?,
                None => {
                    let Some(buildable) = scope.buildable(&target.name) else {
                        scope.ctx.diagnostics.warn(format!(
                            "Scheme '{}' tests unknown target '{}', skipping it",
                            scheme, target.name
                        ));
                        return None;
                    };
                    buildable
                }
            };
            Some(TestableReference {
                buildable,
                skipped: false,
            })
        })
        .collect();

    NativeTestAction {
        build_configuration: scope.configuration(action.build_configuration.as_deref(), scheme),
        testables,
        should_use_launch_scheme_args_env: action.inherit_launch_arguments,
        code_coverage_enabled: action.code_coverage_enabled,
        environment_variables: arguments::environment_variables(&action.environment),
    }
}

/// `container` is the container path of the project owning the scheme
pub fn import_test(action: &NativeTestAction, container: &Path) -> TestAction {
    TestAction {
        build_configuration: Some(action.build_configuration.clone()),
        targets: action
            .testables
            .iter()
            .filter(|t| !t.skipped)
            .map(|testable| {
                let project_path = testable.buildable.project_path();
                TestTarget {
                    name: testable.buildable.target_name.clone(),
                    location: (project_path != container).then_some(project_path),
                }
            })
            .collect(),
        inherit_launch_arguments: action.should_use_launch_scheme_args_env,
        code_coverage_enabled: action.code_coverage_enabled,
        environment: arguments::environment(&action.environment_variables),
    }
}

pub fn export_launch(scope: &SchemeScope, scheme: &str, action: &LaunchAction) -> Result<NativeLaunchAction> {
    Ok(NativeLaunchAction {
        build_configuration: scope.configuration(action.build_configuration.as_deref(), scheme),
        runnable: scope.buildable(&action.target),
        allow_location_simulation: action.simulate_location,
        command_line_arguments: arguments::split(&action.arguments)?,
        environment_variables: arguments::environment_variables(&action.environment),
    })
}

fn runnable_name(runnable: &Option<BuildableReference>) -> String {
    runnable
        .as_ref()
        .map(|r| r.target_name.clone())
        .unwrap_or_default()
}

pub fn import_launch(action: &NativeLaunchAction) -> LaunchAction {
    LaunchAction {
        target: runnable_name(&action.runnable),
        build_configuration: Some(action.build_configuration.clone()),
        simulate_location: action.allow_location_simulation,
        arguments: arguments::join(&action.command_line_arguments),
        environment: arguments::environment(&action.environment_variables),
    }
}

pub fn export_profile(scope: &SchemeScope, scheme: &str, action: &ProfileAction) -> NativeProfileAction {
    NativeProfileAction {
        build_configuration: scope.configuration(action.build_configuration.as_deref(), scheme),
        runnable: scope.buildable(&action.target),
        should_use_launch_scheme_args_env: action.inherit_environment,
    }
}

pub fn import_profile(action: &NativeProfileAction) -> ProfileAction {
    ProfileAction {
        target: runnable_name(&action.runnable),
        build_configuration: Some(action.build_configuration.clone()),
        inherit_environment: action.should_use_launch_scheme_args_env,
    }
}

pub fn export_archive(scope: &SchemeScope, scheme: &str, action: &ArchiveAction) -> NativeArchiveAction {
    NativeArchiveAction {
        build_configuration: scope.configuration(action.build_configuration.as_deref(), scheme),
        custom_archive_name: action.name.clone(),
        reveal_archive_in_organizer: action.reveal,
    }
}

pub fn import_archive(action: &NativeArchiveAction) -> ArchiveAction {
    ArchiveAction {
        name: action.custom_archive_name.clone(),
        build_configuration: Some(action.build_configuration.clone()),
        reveal: action.reveal_archive_in_organizer,
    }
}

pub fn export_analyze(scope: &SchemeScope, scheme: &str, action: &AnalyzeAction) -> NativeAnalyzeAction {
    NativeAnalyzeAction {
        build_configuration: scope.configuration(action.build_configuration.as_deref(), scheme),
    }
}

pub fn import_analyze(action: &NativeAnalyzeAction) -> AnalyzeAction {
    AnalyzeAction {
        build_configuration: Some(action.build_configuration.clone()),
    }
}
