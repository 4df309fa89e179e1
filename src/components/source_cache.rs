//! File-reference identity during one target export.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::native::{FileId, GroupId, NativeProject, SourceTree};

/// Maps absolute source paths to the native file node created for them, so
/// that every build phase of a target referencing the same file shares one
/// node. Nodes already present in the project are reused as well.
#[derive(Debug, Default)]
pub struct SourceReferenceCache {
    references: HashMap<PathBuf, FileId>,
}

impl SourceReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// File node for `relative` (a path relative to `base_dir`), placed in
    /// the group mirroring its directory
    pub fn reference(&mut self, project: &mut NativeProject, base_dir: &Path, relative: &Path) -> FileId {
        self.reference_in(project, base_dir, relative, |project| {
            match relative.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => {
                    project.group_for_directory(parent)
                }
                _ => project.main_group(),
            }
        })
    }

    /// File node for `relative`, placed in an explicit group when created
    pub fn reference_in_group(
        &mut self,
        project: &mut NativeProject,
        base_dir: &Path,
        relative: &Path,
        group: GroupId,
    ) -> FileId {
        self.reference_in(project, base_dir, relative, |_| group)
    }

    fn reference_in<F>(
        &mut self,
        project: &mut NativeProject,
        base_dir: &Path,
        relative: &Path,
        group: F,
    ) -> FileId
    where
        F: FnOnce(&mut NativeProject) -> GroupId,
    {
        let key = base_dir.join(relative);
        if let Some(id) = self.references.get(&key) {
            return *id;
        }

        let id = match project.find_file(relative, SourceTree::Project) {
            Some(existing) => existing,
            None => {
                let group = group(project);
                project.add_file(group, relative.to_path_buf(), SourceTree::Project)
            }
        };
        self.references.insert(key, id);
        id
    }
}
