//! Composition root for one transform
//!
//! The [`Transformer`] owns nothing itself: the profile store, the native
//! store and the diagnostics sink are injected once and lent to every
//! component through a [`Context`]. The input path selects the direction:
//!
//! - a `.xcodeproj` path is imported into a specification document
//! - a `.yml`, `.yaml` or `.json` file, or a file named `Specfile`, is exported
//!   into one native project per variant
//!
//! Every output is built in memory first and only persisted once the whole
//! transform succeeded, so a fatal error never leaves partial output behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::components::project::{self, PROJECT_EXTENSION};
use crate::components::{linter, Context};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::native::NativeStore;
use crate::profiles::ProfileStore;
use crate::spec::{self, Specification};

pub use crate::components::project::Output;

/// Which way a transform goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Native project to specification
    Import,
    /// Specification to native projects
    Export,
}

impl Direction {
    pub fn for_path(path: &Path) -> Result<Self> {
        if path.extension().and_then(|e| e.to_str()) == Some(PROJECT_EXTENSION) {
            return Ok(Direction::Import);
        }
        if spec::is_specification_path(path) {
            return Ok(Direction::Export);
        }
        Err(Error::UnsupportedInput {
            path: path.to_path_buf(),
            hint: Some("expected .xcodeproj, .yml, .yaml, .json or Specfile".to_string()),
        })
    }
}

/// Options of one transform
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Variants to export; empty exports all of them
    pub variants: Vec<String>,
    /// Build every output without writing anything
    pub dry_run: bool,
    /// Where outputs go; defaults to the input's directory
    pub output_dir: Option<PathBuf>,
}

pub struct Transformer<'a> {
    profiles: &'a dyn ProfileStore,
    store: &'a dyn NativeStore,
    diagnostics: &'a Diagnostics,
}

impl<'a> Transformer<'a> {
    pub fn new(
        profiles: &'a dyn ProfileStore,
        store: &'a dyn NativeStore,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            profiles,
            store,
            diagnostics,
        }
    }

    fn context<'b>(&'b self, base_dir: &'b Path) -> Context<'b> {
        Context::new(self.profiles, self.store, self.diagnostics, base_dir)
    }

    /// Transform `input` in the direction its path selects, then persist the
    /// outputs unless this is a dry run
    pub fn process(&self, input: &Path, options: &TransformOptions) -> Result<Vec<Output>> {
        let output_dir = match &options.output_dir {
            Some(dir) => dir.clone(),
            None => parent_dir(input),
        };

        let outputs = match Direction::for_path(input)? {
            Direction::Import => vec![self.import(input, &output_dir)?],
            Direction::Export => {
                let spec = spec::from_file(input)?;
                self.export(&spec, &options.variants, &output_dir)?
            }
        };

        if options.dry_run {
            debug!("Dry run, not writing {} outputs", outputs.len());
        } else {
            self.persist(&outputs)?;
        }
        Ok(outputs)
    }

    /// Specification document for the native project at `project_path`, to be
    /// written as `<output_dir>/<project stem>.yml`
    pub fn import(&self, project_path: &Path, output_dir: &Path) -> Result<Output> {
        let native = self.store.open(project_path)?;
        let base_dir = parent_dir(project_path);
        let ctx = self.context(&base_dir);

        let spec = project::import(&ctx, &native, project_path)?;
        let warnings = linter::lint(&ctx, &spec);
        if warnings > 0 {
            info!("Linter reported {} issues", warnings);
        }

        let stem = project_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        Ok(Output::Spec {
            spec,
            path: output_dir.join(format!("{}.yml", stem)),
        })
    }

    /// Native projects and schemes for a parsed specification
    pub fn export(
        &self,
        spec: &Specification,
        variants: &[String],
        output_dir: &Path,
    ) -> Result<Vec<Output>> {
        spec.validate()?;
        for (label, hook) in [
            ("pre-generate", &spec.pre_generate_hook),
            ("post-generate", &spec.post_generate_hook),
        ] {
            if let Some(hook) = hook {
                self.diagnostics
                    .note(format!("Skipping {} hook {}", label, hook.display()));
            }
        }

        let ctx = self.context(&spec.base_directory);
        project::export(&ctx, spec, variants, output_dir)
    }

    /// Write every output through the native store, specifications as YAML
    pub fn persist(&self, outputs: &[Output]) -> Result<()> {
        for output in outputs {
            match output {
                Output::Project { project, path } => self.store.save_project(project, path)?,
                Output::Scheme {
                    scheme,
                    project_path,
                    name,
                } => self.store.save_scheme(scheme, project_path, name)?,
                Output::Spec { spec, path } => {
                    if let Some(parent) = path.parent() {
                        if !parent.as_os_str().is_empty() {
                            fs::create_dir_all(parent)?;
                        }
                    }
                    fs::write(path, spec::to_yaml(spec)?)?;
                }
            }
            info!("Wrote {}", output.path().display());
        }
        Ok(())
    }
}

/// YAML rendering of an output, as printed by dry runs
pub fn render(output: &Output) -> Result<String> {
    let rendered = match output {
        Output::Project { project, .. } => serde_yaml::to_string(project)?,
        Output::Scheme { scheme, .. } => serde_yaml::to_string(scheme)?,
        Output::Spec { spec, .. } => spec::to_yaml(spec)?,
    };
    Ok(rendered)
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
