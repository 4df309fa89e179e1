//! In-memory native project model
//!
//! The native project document is the IDE's fully expanded object graph:
//! targets, build configurations, build phases, file references, groups and
//! schemes. This module models that graph in memory so that an export pass can
//! build it completely before anything is persisted, and an import pass can
//! read it without touching disk.
//!
//! Objects live in per-kind arenas on [`NativeProject`] and refer to each
//! other through typed indices ([`FileId`], [`GroupId`], [`TargetId`]). Group
//! index 0 is always the project's main group.
//!
//! Persistence of this graph is delegated to a [`store::NativeStore`].

pub mod constants;
pub mod scheme;
pub mod store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::spec::Settings;

pub use scheme::NativeScheme;
pub use store::{JsonNativeStore, MemoryNativeStore, NativeStore};

/// Attribute holding the specification version that produced the document
pub const VERSION_ATTRIBUTE: &str = "SpecweaveVersion";

const PRODUCTS_GROUP: &str = "Products";
const FRAMEWORKS_GROUP: &str = "Frameworks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub usize);

/// Location a file reference's path is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceTree {
    /// Relative to the project base directory
    Project,
    /// Relative to the active SDK
    SdkRoot,
    /// Relative to the build products directory
    BuiltProducts,
    Absolute,
}

/// A file known to the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReference {
    pub path: PathBuf,
    pub source_tree: SourceTree,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl FileReference {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }
}

/// Child of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupChild {
    File(FileId),
    Group(GroupId),
}

/// A folder in the project navigator. Variant groups gather every localized
/// copy of one logical file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub children: Vec<GroupChild>,
    #[serde(default)]
    pub is_variant: bool,
}

/// A product of a target living in another native project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProduct {
    /// Path of the other project, relative to the project base directory
    pub project: PathBuf,
    pub target_name: String,
    pub product_name: String,
}

/// What a build file points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildItem {
    File(FileId),
    VariantGroup(GroupId),
    /// The product of another target of this project
    Product(TargetId),
    Remote(RemoteProduct),
}

/// Membership of an item in a build phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildFile {
    pub item: BuildItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_flags: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

impl BuildFile {
    pub fn new(item: BuildItem) -> Self {
        Self {
            item,
            compiler_flags: None,
            attributes: Vec::new(),
        }
    }

    /// Append flags, space separated, to whatever is already set
    pub fn append_compiler_flags(&mut self, flags: &str) {
        let flags = flags.trim();
        if flags.is_empty() {
            return;
        }
        self.compiler_flags = Some(match self.compiler_flags.take() {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, flags),
            _ => flags.to_string(),
        });
    }

    pub fn add_attribute(&mut self, attribute: &str) {
        if !self.attributes.iter().any(|a| a == attribute) {
            self.attributes.push(attribute.to_string());
        }
    }
}

/// Destination folder of a copy-files phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyDestination {
    Frameworks,
    PlugIns,
    ProductsDirectory,
}

impl CopyDestination {
    /// Numeric `dstSubfolderSpec` used by the IDE
    pub fn subfolder_spec(&self) -> u32 {
        match self {
            CopyDestination::Frameworks => 10,
            CopyDestination::PlugIns => 13,
            CopyDestination::ProductsDirectory => 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildPhaseKind {
    Sources,
    Headers,
    Resources,
    Frameworks,
    CopyFiles {
        destination: CopyDestination,
        #[serde(default)]
        dst_path: String,
    },
    ShellScript {
        script: String,
        shell: String,
        #[serde(default)]
        input_paths: Vec<String>,
        #[serde(default)]
        output_paths: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildPhase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: BuildPhaseKind,
    #[serde(default)]
    pub files: Vec<BuildFile>,
}

impl BuildPhase {
    pub fn new(kind: BuildPhaseKind) -> Self {
        Self {
            name: None,
            kind,
            files: Vec::new(),
        }
    }

    pub fn named(name: impl Into<String>, kind: BuildPhaseKind) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            files: Vec::new(),
        }
    }

    pub fn contains(&self, item: &BuildItem) -> bool {
        self.files.iter().any(|f| &f.item == item)
    }

    /// Add an item, reusing the existing membership when already present
    pub fn add(&mut self, item: BuildItem) -> &mut BuildFile {
        let index = match self.files.iter().position(|f| f.item == item) {
            Some(i) => i,
            None => {
                self.files.push(BuildFile::new(item));
                self.files.len() - 1
            }
        };
        &mut self.files[index]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    pub name: String,
    #[serde(default)]
    pub settings: Settings,
    /// External settings file applied by the IDE itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_configuration: Option<FileId>,
}

impl BuildConfiguration {
    pub fn new(name: impl Into<String>, settings: Settings) -> Self {
        Self {
            name: name.into(),
            settings,
            base_configuration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeTarget {
    pub name: String,
    pub product_type: String,
    pub product_name: String,
    pub product: FileId,
    #[serde(default)]
    pub configurations: Vec<BuildConfiguration>,
    #[serde(default)]
    pub build_phases: Vec<BuildPhase>,
    #[serde(default)]
    pub dependencies: Vec<TargetId>,
}

impl NativeTarget {
    fn unique_phase_index(&self, kind: &BuildPhaseKind) -> Option<usize> {
        self.build_phases.iter().position(|p| &p.kind == kind)
    }

    /// The target's single sources/headers/resources/frameworks phase,
    /// created at the end of the phase list on first use
    pub fn phase_mut(&mut self, kind: BuildPhaseKind) -> &mut BuildPhase {
        let index = match self.unique_phase_index(&kind) {
            Some(i) => i,
            None => {
                self.build_phases.push(BuildPhase::new(kind));
                self.build_phases.len() - 1
            }
        };
        &mut self.build_phases[index]
    }

    pub fn phase(&self, kind: &BuildPhaseKind) -> Option<&BuildPhase> {
        self.build_phases.iter().find(|p| &p.kind == kind)
    }

    pub fn phase_named(&self, name: &str) -> Option<&BuildPhase> {
        self.build_phases
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
    }

    pub fn configuration(&self, name: &str) -> Option<&BuildConfiguration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    pub fn add_dependency(&mut self, target: TargetId) {
        if !self.dependencies.contains(&target) {
            self.dependencies.push(target);
        }
    }
}

/// The whole native project object graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeProject {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub configurations: Vec<BuildConfiguration>,
    #[serde(default)]
    pub targets: Vec<NativeTarget>,
    #[serde(default)]
    pub files: Vec<FileReference>,
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Other native projects referenced by this one
    #[serde(default)]
    pub subprojects: Vec<PathBuf>,
}

impl Default for NativeProject {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeProject {
    /// A fresh project as the IDE creates it: main group, products group and
    /// the default Debug and Release configurations.
    pub fn new() -> Self {
        let mut project = Self {
            attributes: BTreeMap::new(),
            configurations: vec![
                BuildConfiguration::new("Debug", Settings::new()),
                BuildConfiguration::new("Release", Settings::new()),
            ],
            targets: Vec::new(),
            files: Vec::new(),
            groups: vec![Group {
                name: String::new(),
                children: Vec::new(),
                is_variant: false,
            }],
            subprojects: Vec::new(),
        };
        project.child_group(project.main_group(), PRODUCTS_GROUP);
        project
    }

    pub fn main_group(&self) -> GroupId {
        GroupId(0)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn clear_configurations(&mut self) {
        self.configurations.clear();
    }

    pub fn file(&self, id: FileId) -> &FileReference {
        &self.files[id.0]
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    pub fn target(&self, id: TargetId) -> &NativeTarget {
        &self.targets[id.0]
    }

    pub fn target_mut(&mut self, id: TargetId) -> &mut NativeTarget {
        &mut self.targets[id.0]
    }

    pub fn target_by_name(&self, name: &str) -> Option<TargetId> {
        self.targets.iter().position(|t| t.name == name).map(TargetId)
    }

    pub fn target_ids(&self) -> impl Iterator<Item = TargetId> {
        (0..self.targets.len()).map(TargetId)
    }

    /// Find a named child group, creating it when missing
    pub fn child_group(&mut self, parent: GroupId, name: &str) -> GroupId {
        let existing = self.groups[parent.0].children.iter().find_map(|c| match c {
            GroupChild::Group(g) if !self.groups[g.0].is_variant && self.groups[g.0].name == name => {
                Some(*g)
            }
            _ => None,
        });
        if let Some(id) = existing {
            return id;
        }

        let id = GroupId(self.groups.len());
        self.groups.push(Group {
            name: name.to_string(),
            children: Vec::new(),
            is_variant: false,
        });
        self.groups[parent.0].children.push(GroupChild::Group(id));
        id
    }

    /// First index in the graph that points outside its arena, described.
    /// Loaded documents are checked with this before anything reads them.
    pub fn dangling_reference(&self) -> Option<String> {
        let file = |id: FileId| (id.0 >= self.files.len()).then(|| format!("file #{}", id.0));
        let group = |id: GroupId| (id.0 >= self.groups.len()).then(|| format!("group #{}", id.0));
        let target =
            |id: TargetId| (id.0 >= self.targets.len()).then(|| format!("target #{}", id.0));
        let configuration = |config: &BuildConfiguration| config.base_configuration.and_then(file);

        if self.groups.is_empty() {
            return Some("missing main group".to_string());
        }
        for child in self.groups.iter().flat_map(|g| &g.children) {
            let missing = match *child {
                GroupChild::File(id) => file(id),
                GroupChild::Group(id) => group(id),
            };
            if let Some(missing) = missing {
                return Some(format!("group refers to missing {}", missing));
            }
        }
        if let Some(missing) = self.configurations.iter().find_map(configuration) {
            return Some(format!("project configuration refers to missing {}", missing));
        }
        for native in &self.targets {
            let missing = file(native.product)
                .or_else(|| native.configurations.iter().find_map(configuration))
                .or_else(|| native.dependencies.iter().find_map(|&id| target(id)))
                .or_else(|| {
                    native
                        .build_phases
                        .iter()
                        .flat_map(|phase| &phase.files)
                        .find_map(|build_file| match build_file.item {
                            BuildItem::File(id) => file(id),
                            BuildItem::VariantGroup(id) => group(id),
                            BuildItem::Product(id) => target(id),
                            BuildItem::Remote(_) => None,
                        })
                });
            if let Some(missing) = missing {
                return Some(format!("target '{}' refers to missing {}", native.name, missing));
            }
        }
        None
    }

    /// Group mirroring a directory relative to the project base directory
    pub fn group_for_directory(&mut self, directory: &Path) -> GroupId {
        let mut group = self.main_group();
        for component in directory.iter() {
            let name = component.to_string_lossy();
            group = self.child_group(group, &name);
        }
        group
    }

    pub fn products_group(&mut self) -> GroupId {
        let main = self.main_group();
        self.child_group(main, PRODUCTS_GROUP)
    }

    pub fn frameworks_group(&mut self) -> GroupId {
        let main = self.main_group();
        self.child_group(main, FRAMEWORKS_GROUP)
    }

    /// Create a file reference and attach it to a group
    pub fn add_file(&mut self, group: GroupId, path: PathBuf, source_tree: SourceTree) -> FileId {
        let file_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(constants::file_type_for_extension)
            .map(str::to_string);
        let id = FileId(self.files.len());
        self.files.push(FileReference {
            path,
            source_tree,
            file_type,
        });
        self.groups[group.0].children.push(GroupChild::File(id));
        id
    }

    /// Find a file reference by path and source tree
    pub fn find_file(&self, path: &Path, source_tree: SourceTree) -> Option<FileId> {
        self.files
            .iter()
            .position(|f| f.path == path && f.source_tree == source_tree)
            .map(FileId)
    }

    /// Find or create a variant group under `parent`
    pub fn variant_group(&mut self, parent: GroupId, name: &str) -> GroupId {
        let existing = self.groups[parent.0].children.iter().find_map(|c| match c {
            GroupChild::Group(g) if self.groups[g.0].is_variant && self.groups[g.0].name == name => {
                Some(*g)
            }
            _ => None,
        });
        if let Some(id) = existing {
            return id;
        }

        let id = GroupId(self.groups.len());
        self.groups.push(Group {
            name: name.to_string(),
            children: Vec::new(),
            is_variant: true,
        });
        self.groups[parent.0].children.push(GroupChild::Group(id));
        id
    }

    /// Files directly inside a group (not recursive)
    pub fn group_files(&self, group: GroupId) -> Vec<FileId> {
        self.groups[group.0]
            .children
            .iter()
            .filter_map(|c| match c {
                GroupChild::File(f) => Some(*f),
                GroupChild::Group(_) => None,
            })
            .collect()
    }

    /// Add a target shell with its product reference and no phases
    pub fn add_target(&mut self, name: &str, product_type: &str) -> TargetId {
        let product_name = match constants::product_extension(product_type) {
            Some(ext) if !ext.is_empty() => format!("{}.{}", name, ext),
            _ => name.to_string(),
        };
        let products = self.products_group();
        let product = self.add_file(
            products,
            PathBuf::from(&product_name),
            SourceTree::BuiltProducts,
        );

        let id = TargetId(self.targets.len());
        self.targets.push(NativeTarget {
            name: name.to_string(),
            product_type: product_type.to_string(),
            product_name,
            product,
            configurations: Vec::new(),
            build_phases: Vec::new(),
            dependencies: Vec::new(),
        });
        id
    }

    pub fn add_subproject(&mut self, path: &Path) {
        if !self.subprojects.iter().any(|p| p == path) {
            self.subprojects.push(path.to_path_buf());
        }
    }
}
