//! Persistence collaborator for native project documents.
//!
//! The transform never reads or writes native documents directly. It goes
//! through a [`NativeStore`], which opens existing projects (sub-projects,
//! external test bundles, import inputs) and persists finished graphs.
//!
//! - [`JsonNativeStore`] keeps the graph as JSON inside the `.xcodeproj`
//!   directory: `project.json` for the project and
//!   `xcshareddata/xcschemes/<name>.json` for each scheme.
//! - [`MemoryNativeStore`] keeps everything in a map, for tests and dry runs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::{NativeProject, NativeScheme};
use crate::error::{Error, Result};

const PROJECT_FILE: &str = "project.json";
const SCHEMES_DIR: &str = "xcshareddata/xcschemes";

pub trait NativeStore {
    /// Load the project document at `path`
    fn open(&self, path: &Path) -> Result<NativeProject>;

    fn save_project(&self, project: &NativeProject, path: &Path) -> Result<()>;

    fn save_scheme(&self, scheme: &NativeScheme, project_path: &Path, name: &str) -> Result<()>;

    /// Shared schemes of the project at `project_path`, sorted by name
    fn open_schemes(&self, project_path: &Path) -> Result<Vec<NativeScheme>>;
}

/// JSON-on-disk store
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonNativeStore;

impl JsonNativeStore {
    pub fn new() -> Self {
        Self
    }

    pub fn scheme_path(project_path: &Path, name: &str) -> PathBuf {
        project_path.join(SCHEMES_DIR).join(format!("{}.json", name))
    }
}

impl NativeStore for JsonNativeStore {
    fn open(&self, path: &Path) -> Result<NativeProject> {
        let file = path.join(PROJECT_FILE);
        let content = fs::read_to_string(&file).map_err(|e| Error::NativeProject {
            path: path.to_path_buf(),
            message: format!("cannot read {}: {}", file.display(), e),
        })?;
        let project: NativeProject =
            serde_json::from_str(&content).map_err(|e| Error::NativeProject {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        if let Some(message) = project.dangling_reference() {
            return Err(Error::NativeProject {
                path: path.to_path_buf(),
                message,
            });
        }
        Ok(project)
    }

    fn save_project(&self, project: &NativeProject, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        let content = serde_json::to_string_pretty(project)?;
        fs::write(path.join(PROJECT_FILE), content)?;
        debug!("Wrote native project {}", path.display());
        Ok(())
    }

    fn save_scheme(&self, scheme: &NativeScheme, project_path: &Path, name: &str) -> Result<()> {
        let file = Self::scheme_path(project_path, name);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, serde_json::to_string_pretty(scheme)?)?;
        debug!("Wrote scheme {}", file.display());
        Ok(())
    }

    fn open_schemes(&self, project_path: &Path) -> Result<Vec<NativeScheme>> {
        let dir = project_path.join(SCHEMES_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        files.retain(|f| f.extension().is_some_and(|e| e == "json"));
        files.sort();

        files
            .iter()
            .map(|file| {
                let content = fs::read_to_string(file)?;
                serde_json::from_str(&content).map_err(|e| Error::NativeProject {
                    path: project_path.to_path_buf(),
                    message: format!("invalid scheme {}: {}", file.display(), e),
                })
            })
            .collect()
    }
}

/// In-memory store keyed by project path
#[derive(Debug, Default)]
pub struct MemoryNativeStore {
    projects: RefCell<HashMap<PathBuf, NativeProject>>,
    schemes: RefCell<HashMap<(PathBuf, String), NativeScheme>>,
}

impl MemoryNativeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a project so that later `open` calls find it
    pub fn insert(&self, path: impl Into<PathBuf>, project: NativeProject) {
        self.projects.borrow_mut().insert(path.into(), project);
    }

    pub fn project(&self, path: &Path) -> Option<NativeProject> {
        self.projects.borrow().get(path).cloned()
    }

    pub fn scheme(&self, project_path: &Path, name: &str) -> Option<NativeScheme> {
        self.schemes
            .borrow()
            .get(&(project_path.to_path_buf(), name.to_string()))
            .cloned()
    }

    pub fn project_count(&self) -> usize {
        self.projects.borrow().len()
    }
}

impl NativeStore for MemoryNativeStore {
    fn open(&self, path: &Path) -> Result<NativeProject> {
        self.project(path).ok_or_else(|| Error::NativeProject {
            path: path.to_path_buf(),
            message: "no such project".to_string(),
        })
    }

    fn save_project(&self, project: &NativeProject, path: &Path) -> Result<()> {
        self.insert(path, project.clone());
        Ok(())
    }

    fn save_scheme(&self, scheme: &NativeScheme, project_path: &Path, name: &str) -> Result<()> {
        self.schemes
            .borrow_mut()
            .insert((project_path.to_path_buf(), name.to_string()), scheme.clone());
        Ok(())
    }

    fn open_schemes(&self, project_path: &Path) -> Result<Vec<NativeScheme>> {
        let mut schemes: Vec<_> = self
            .schemes
            .borrow()
            .iter()
            .filter(|((path, _), _)| path == project_path)
            .map(|((_, name), scheme)| (name.clone(), scheme.clone()))
            .collect();
        schemes.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(schemes.into_iter().map(|(_, scheme)| scheme).collect())
    }
}
