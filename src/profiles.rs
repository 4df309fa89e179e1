//! # Settings Profiles
//!
//! A profile is a named, reusable bundle of default build settings. Names are
//! namespaced as `"<namespace>:<name>"` (`general:debug`, `platform:ios`) or
//! bare for product-type profiles (`application`, `app-extension`).
//!
//! Profiles are looked up through the [`ProfileStore`] trait:
//!
//! - [`DirectoryProfileStore`] reads `<root>/<name>.yml`, with every `:` in the
//!   name replaced by `_`. Results are cached for the lifetime of the store.
//! - [`MemoryProfileStore`] is map-backed. [`MemoryProfileStore::builtin`]
//!   provides the default profile set compiled into the binary.
//!
//! An unknown profile is never fatal: the store answers `None` and the caller
//! reports it and carries on with an empty bundle.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::spec::Settings;

/// Profiles compiled into the binary, as (name, YAML content)
const BUILTIN_PROFILES: &[(&str, &str)] = &[
    ("general:debug", include_str!("../profiles/general_debug.yml")),
    ("general:release", include_str!("../profiles/general_release.yml")),
    ("ios:debug", include_str!("../profiles/ios_debug.yml")),
    ("ios:release", include_str!("../profiles/ios_release.yml")),
    ("mac:debug", include_str!("../profiles/mac_debug.yml")),
    ("mac:release", include_str!("../profiles/mac_release.yml")),
    ("tv:debug", include_str!("../profiles/tv_debug.yml")),
    ("tv:release", include_str!("../profiles/tv_release.yml")),
    ("watch:debug", include_str!("../profiles/watch_debug.yml")),
    ("watch:release", include_str!("../profiles/watch_release.yml")),
    ("platform:ios", include_str!("../profiles/platform_ios.yml")),
    ("platform:mac", include_str!("../profiles/platform_mac.yml")),
    ("platform:tv", include_str!("../profiles/platform_tv.yml")),
    ("platform:watch", include_str!("../profiles/platform_watch.yml")),
    ("application", include_str!("../profiles/application.yml")),
    ("framework", include_str!("../profiles/framework.yml")),
    ("app-extension", include_str!("../profiles/app-extension.yml")),
    ("unit-test-bundle", include_str!("../profiles/unit-test-bundle.yml")),
];

/// Lookup service for named settings profiles
pub trait ProfileStore {
    /// Resolve a profile name to its settings, `None` when unknown
    fn lookup(&self, name: &str) -> Option<Settings>;

    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// File name a profile is stored under
pub fn profile_file_name(name: &str) -> String {
    format!("{}.yml", name.replace(':', "_"))
}

/// Profiles read from YAML files in one directory
#[derive(Debug)]
pub struct DirectoryProfileStore {
    root: PathBuf,
    cache: RefCell<HashMap<String, Option<Settings>>>,
}

impl DirectoryProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(profile_file_name(name))
    }

    fn load(&self, name: &str) -> Option<Settings> {
        let path = self.path_for(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Profile '{}' not readable at {}: {}", name, path.display(), e);
                return None;
            }
        };
        match serde_yaml::from_str::<Option<Settings>>(&content) {
            Ok(settings) => Some(settings.unwrap_or_default()),
            Err(e) => {
                warn!("Ignoring malformed profile {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl ProfileStore for DirectoryProfileStore {
    fn lookup(&self, name: &str) -> Option<Settings> {
        if let Some(cached) = self.cache.borrow().get(name) {
            return cached.clone();
        }
        let loaded = self.load(name);
        self.cache
            .borrow_mut()
            .insert(name.to_string(), loaded.clone());
        loaded
    }

    fn contains(&self, name: &str) -> bool {
        if let Some(cached) = self.cache.borrow().get(name) {
            return cached.is_some();
        }
        self.path_for(name).is_file()
    }
}

/// Map-backed profile store
#[derive(Debug, Default, Clone)]
pub struct MemoryProfileStore {
    profiles: HashMap<String, Settings>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default profile set shipped with the binary
    pub fn builtin() -> Self {
        let mut store = Self::new();
        for (name, content) in BUILTIN_PROFILES {
            match serde_yaml::from_str::<Settings>(content) {
                Ok(settings) => store.insert(*name, settings),
                Err(e) => warn!("Built-in profile '{}' is malformed: {}", name, e),
            }
        }
        store
    }

    pub fn insert(&mut self, name: impl Into<String>, settings: Settings) {
        self.profiles.insert(name.into(), settings);
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, settings: Settings) -> Self {
        self.insert(name, settings);
        self
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn lookup(&self, name: &str) -> Option<Settings> {
        self.profiles.get(name).cloned()
    }

    fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }
}
