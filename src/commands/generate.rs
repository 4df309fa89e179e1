//! Generate command implementation
//!
//! Runs one transform. A `.xcodeproj` input produces a specification next to
//! it; a specification input (`.yml`, `.yaml`, `.json` or `Specfile`)
//! produces one project per variant plus its schemes. Diagnostics are printed
//! to stderr after the transform, followed by a summary line.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use log::debug;

use specweave::diagnostics::Diagnostics;
use specweave::native::JsonNativeStore;
use specweave::output::{render_diagnostic, render_summary, OutputConfig};
use specweave::profiles::{DirectoryProfileStore, MemoryProfileStore, ProfileStore};
use specweave::transform::{self, TransformOptions, Transformer};

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Project (.xcodeproj) or specification (.yml, .yaml, .json, Specfile)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Directory of settings profiles [default: <config dir>/specweave/profiles if present, else built-ins]
    #[arg(long, value_name = "DIR", env = "SPECWEAVE_PROFILES")]
    pub profiles: Option<PathBuf>,

    /// Only export this variant (repeatable)
    #[arg(long = "variant", value_name = "NAME")]
    pub variants: Vec<String>,

    /// Print what would be written without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Profile root to use when none is given: the user's config directory,
/// when it has one
fn default_profile_root() -> Option<PathBuf> {
    let root = dirs::config_dir()?.join("specweave").join("profiles");
    root.is_dir().then_some(root)
}

fn profile_store(root: Option<&Path>) -> Result<Box<dyn ProfileStore>> {
    match root {
        Some(root) => {
            if !root.is_dir() {
                anyhow::bail!("Profile directory not found: {}", root.display());
            }
            debug!("Using profiles from {}", root.display());
            Ok(Box::new(DirectoryProfileStore::new(root)))
        }
        None => match default_profile_root() {
            Some(root) => {
                debug!("Using profiles from {}", root.display());
                Ok(Box::new(DirectoryProfileStore::new(root)))
            }
            None => Ok(Box::new(MemoryProfileStore::builtin())),
        },
    }
}

/// Execute the generate command
pub fn execute(args: GenerateArgs, output: &OutputConfig) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input not found: {}", args.input.display());
    }

    let profiles = profile_store(args.profiles.as_deref())?;
    let store = JsonNativeStore::new();
    let diagnostics = Diagnostics::new();
    let transformer = Transformer::new(profiles.as_ref(), &store, &diagnostics);

    let options = TransformOptions {
        variants: args.variants,
        dry_run: args.dry_run,
        output_dir: args.output,
    };
    let outputs = transformer.process(&args.input, &options)?;

    let warnings = diagnostics.warning_count();
    if !args.quiet {
        for diagnostic in diagnostics.drain() {
            eprintln!("{}", render_diagnostic(output, &diagnostic));
        }
    }

    if args.dry_run {
        for document in &outputs {
            println!("# {}", document.path().display());
            print!("{}", transform::render(document)?);
        }
    } else if !args.quiet {
        for document in &outputs {
            println!("  {}", document.path().display());
        }
    }

    if !args.quiet {
        println!(
            "{}",
            render_summary(output, outputs.len(), warnings, args.dry_run)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SPEC: &str = r#"
version: 3.0.0
configurations:
  - name: Debug
    type: debug
    profiles: ["general:debug", "ios:debug"]
targets:
  - name: App
    type: ":application"
"#;

    fn plain() -> OutputConfig {
        OutputConfig { use_color: false }
    }

    fn args(input: PathBuf) -> GenerateArgs {
        GenerateArgs {
            input,
            output: None,
            profiles: None,
            variants: Vec::new(),
            dry_run: false,
            quiet: true,
        }
    }

    #[test]
    fn test_execute_missing_input() {
        let result = execute(
            args(PathBuf::from("/nonexistent/project.yml")),
            &plain(),
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Input not found"));
    }

    #[test]
    fn test_execute_missing_profile_directory() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("project.yml");
        fs::write(&input, SPEC).unwrap();

        let mut args = args(input);
        args.profiles = Some(temp_dir.path().join("nope"));
        let result = execute(args, &plain());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Profile directory not found"));
    }

    #[test]
    fn test_execute_writes_project() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("project.yml");
        fs::write(&input, SPEC).unwrap();

        execute(args(input), &plain()).unwrap();
        assert!(temp_dir
            .path()
            .join("project.xcodeproj/project.json")
            .is_file());
    }

    #[test]
    fn test_execute_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("project.yml");
        fs::write(&input, SPEC).unwrap();

        let mut args = args(input);
        args.dry_run = true;
        execute(args, &plain()).unwrap();
        assert!(!temp_dir.path().join("project.xcodeproj").exists());
    }

    #[test]
    fn test_explicit_profile_directory_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let store = profile_store(Some(temp_dir.path())).unwrap();
        assert!(store.lookup("general:debug").is_none());
    }
}
