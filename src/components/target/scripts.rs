//! Run-script phases. Prebuild scripts go in front of every other phase,
//! postbuild scripts after all of them.

use std::path::PathBuf;

use crate::native::{BuildPhase, BuildPhaseKind, NativeTarget};
use crate::spec::{RunScript, Target};

pub const DEFAULT_SHELL: &str = "/bin/sh";

const SCRIPT_PREFIX: &str = "\"${SRCROOT}/";

fn phase(script: &RunScript) -> BuildPhase {
    BuildPhase::named(
        script.phase_name(),
        BuildPhaseKind::ShellScript {
            script: format!("{}{}\"", SCRIPT_PREFIX, script.script_path.display()),
            shell: script
                .shell
                .clone()
                .unwrap_or_else(|| DEFAULT_SHELL.to_string()),
            input_paths: script.inputs.clone(),
            output_paths: script.outputs.clone(),
        },
    )
}

pub fn export(target: &Target, native: &mut NativeTarget) {
    for (index, script) in target.prebuild_scripts.iter().enumerate() {
        native.build_phases.insert(index, phase(script));
    }
    for script in &target.postbuild_scripts {
        native.build_phases.push(phase(script));
    }
}

fn script_path(script: &str) -> PathBuf {
    let trimmed = script.trim();
    match trimmed.strip_prefix(SCRIPT_PREFIX) {
        Some(rest) => PathBuf::from(rest.strip_suffix('"').unwrap_or(rest)),
        None => PathBuf::from(trimmed),
    }
}

fn run_script(phase: &BuildPhase) -> Option<RunScript> {
    let BuildPhaseKind::ShellScript {
        script,
        shell,
        input_paths,
        output_paths,
    } = &phase.kind
    else {
        return None;
    };

    let mut run_script = RunScript::new(script_path(script));
    run_script.inputs = input_paths.clone();
    run_script.outputs = output_paths.clone();
    if shell != DEFAULT_SHELL {
        run_script.shell = Some(shell.clone());
    }
    if let Some(name) = &phase.name {
        if *name != run_script.phase_name() {
            run_script.name = Some(name.clone());
        }
    }
    Some(run_script)
}

/// Prebuild and postbuild scripts, split around the first sources phase
pub fn import(native: &NativeTarget) -> (Vec<RunScript>, Vec<RunScript>) {
    let boundary = native
        .build_phases
        .iter()
        .position(|p| p.kind == BuildPhaseKind::Sources)
        .unwrap_or(native.build_phases.len());

    let mut prebuild = Vec::new();
    let mut postbuild = Vec::new();
    for (index, phase) in native.build_phases.iter().enumerate() {
        let Some(script) = run_script(phase) else {
            continue;
        };
        if index < boundary {
            prebuild.push(script);
        } else {
            postbuild.push(script);
        }
    }
    (prebuild, postbuild)
}
