//! # Transformation Components
//!
//! Every facet of a project is converted by one component module. Each module
//! exposes an `import` function (native → specification) and/or an `export`
//! function (specification → native); there is no runtime direction flag.
//!
//! ## Ordering
//!
//! Export runs in a fixed order, driven by [`project::export`]:
//!
//! 1. **Configurations**: project-level build configurations.
//! 2. **Target shells**: every target gets its native counterpart and product
//!    reference before anything else, so that references can find each other.
//! 3. **Target facets**: configurations, sources, resources and references of
//!    each target.
//! 4. **Embeds**: cross-target copy phases, over the completed target map.
//! 5. **Scripts**: pre- and post-build script phases around the rest.
//! 6. **Schemes**: actions bound to the finished targets.
//!
//! Collaborators are passed in through a [`Context`] built once by the
//! composition root in [`crate::transform`].

use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;
use crate::native::NativeStore;
use crate::profiles::ProfileStore;

pub mod configuration;
pub mod embeds;
pub mod linter;
pub mod project;
pub mod schemes;
pub mod settings;
pub mod source_cache;
pub mod target;
pub mod variants;

/// Collaborators shared by every component during one transform
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub profiles: &'a dyn ProfileStore,
    pub store: &'a dyn NativeStore,
    pub diagnostics: &'a Diagnostics,
    /// Directory relative paths are resolved against
    pub base_dir: &'a Path,
}

impl<'a> Context<'a> {
    pub fn new(
        profiles: &'a dyn ProfileStore,
        store: &'a dyn NativeStore,
        diagnostics: &'a Diagnostics,
        base_dir: &'a Path,
    ) -> Self {
        Self {
            profiles,
            store,
            diagnostics,
            base_dir,
        }
    }

    /// Same collaborators, resolving against another directory
    pub fn with_base_dir<'b>(&self, base_dir: &'b Path) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            profiles: self.profiles,
            store: self.store,
            diagnostics: self.diagnostics,
            base_dir,
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Path relative to the base directory, or unchanged when outside it
    pub fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.base_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    pub fn settings(&self) -> settings::SettingsMerger<'a> {
        settings::SettingsMerger::new(self.profiles, self.diagnostics)
    }
}
