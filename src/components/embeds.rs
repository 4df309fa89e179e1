//! Target embedding: which built products are copied into which targets.
//!
//! Embedding of frameworks happens while references are exported. Watch apps
//! and app extensions are embedded afterwards, in a pass over the completed
//! target map: a target referencing another target whose first configuration
//! carries an embeddable role profile gets that target's product copied into
//! the matching phase.

use std::collections::BTreeMap;

use log::debug;

use super::target::TargetScope;
use crate::native::{
    BuildFile, BuildItem, BuildPhase, BuildPhaseKind, CopyDestination, NativeProject, NativeTarget,
};
use crate::spec::{Reference, Target};

pub const EMBED_FRAMEWORKS_PHASE: &str = "Embed Frameworks";
pub const EMBED_WATCH_CONTENT_PHASE: &str = "Embed Watch Content";
pub const EMBED_APP_EXTENSIONS_PHASE: &str = "Embed App Extensions";

pub const CODE_SIGN_ON_COPY: &str = "CodeSignOnCopy";
pub const REMOVE_HEADERS_ON_COPY: &str = "RemoveHeadersOnCopy";

/// Copy phase a product is embedded through
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmbedRole {
    Frameworks,
    WatchContent,
    AppExtensions,
}

impl EmbedRole {
    pub fn phase_name(self) -> &'static str {
        match self {
            EmbedRole::Frameworks => EMBED_FRAMEWORKS_PHASE,
            EmbedRole::WatchContent => EMBED_WATCH_CONTENT_PHASE,
            EmbedRole::AppExtensions => EMBED_APP_EXTENSIONS_PHASE,
        }
    }

    fn phase_kind(self) -> BuildPhaseKind {
        let (destination, dst_path) = match self {
            EmbedRole::Frameworks => (CopyDestination::Frameworks, ""),
            EmbedRole::WatchContent => {
                (CopyDestination::ProductsDirectory, "$(CONTENTS_FOLDER_PATH)/Watch")
            }
            EmbedRole::AppExtensions => (CopyDestination::PlugIns, ""),
        };
        BuildPhaseKind::CopyFiles {
            destination,
            dst_path: dst_path.to_string(),
        }
    }

    /// Role selected by a profile name; namespaced names match on their last
    /// segment
    pub fn for_profile(profile: &str) -> Option<Self> {
        match profile.rsplit(':').next().unwrap_or(profile) {
            "application.watchapp2" | "app-extension-as-watch-payload" => {
                Some(EmbedRole::WatchContent)
            }
            "watchkit2-extension" | "tv-broadcast-extension" | "app-extension" => {
                Some(EmbedRole::AppExtensions)
            }
            _ => None,
        }
    }
}

/// Copy phases of one target, keyed by role. A phase exists only once
/// something was added to it.
#[derive(Debug, Default)]
pub struct EmbedPhases {
    phases: BTreeMap<EmbedRole, BuildPhase>,
}

impl EmbedPhases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, role: EmbedRole, item: BuildItem) -> &mut BuildFile {
        self.phases
            .entry(role)
            .or_insert_with(|| BuildPhase::named(role.phase_name(), role.phase_kind()))
            .add(item)
    }

    pub fn phase(&self, role: EmbedRole) -> Option<&BuildPhase> {
        self.phases.get(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Move every populated phase to the end of the target's phase list
    pub fn install(&mut self, target: &mut NativeTarget) {
        for (_, phase) in std::mem::take(&mut self.phases) {
            if !phase.files.is_empty() {
                target.build_phases.push(phase);
            }
        }
    }
}

/// Role of a target, from the profiles of its first configuration
pub fn role_of(target: &Target) -> Option<EmbedRole> {
    target
        .configurations
        .first()?
        .profiles
        .iter()
        .find_map(|p| EmbedRole::for_profile(p))
}

/// Embed watch apps and extensions into the targets referencing them.
/// `scopes[i]` belongs to `targets[i]`.
pub fn export(targets: &[Target], project: &NativeProject, scopes: &mut [TargetScope]) {
    for (target, scope) in targets.iter().zip(scopes.iter_mut()) {
        for reference in &target.references {
            let Reference::Target { name, .. } = reference else {
                continue;
            };
            let Some(role) = targets.iter().find(|t| &t.name == name).and_then(role_of) else {
                continue;
            };
            let Some(embedded) = project.target_by_name(name) else {
                continue;
            };
            if embedded == scope.id {
                continue;
            }
            scope
                .embeds
                .add(role, BuildItem::Product(embedded))
                .add_attribute(REMOVE_HEADERS_ON_COPY);
            debug!(
                "Embedding {} into {} through '{}'",
                name,
                target.name,
                role.phase_name()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::constants::{APPLICATION, APP_EXTENSION};
    use crate::native::{FileId, TargetId};
    use crate::spec::{ReferenceSettings, TargetConfiguration};

    fn target(name: &str, profiles: &[&str], references: &[&str]) -> Target {
        let mut target = Target::new(name, None);
        target.configurations.push(TargetConfiguration::new(
            "Debug",
            profiles.iter().map(|p| p.to_string()).collect(),
        ));
        target.references = references
            .iter()
            .map(|name| Reference::Target {
                name: name.to_string(),
                settings: ReferenceSettings::default(),
            })
            .collect();
        target
    }

    /// Runs the pass with native targets for `native` only
    fn embed(targets: &[Target], native: &[&str]) -> (NativeProject, Vec<TargetScope>) {
        let mut project = NativeProject::new();
        let mut scopes: Vec<TargetScope> = native
            .iter()
            .map(|name| TargetScope::new(project.add_target(name, APP_EXTENSION)))
            .collect();
        export(targets, &project, &mut scopes);
        (project, scopes)
    }

    #[test]
    fn test_roles_for_profiles() {
        assert_eq!(
            EmbedRole::for_profile("application.watchapp2"),
            Some(EmbedRole::WatchContent)
        );
        assert_eq!(
            EmbedRole::for_profile("app-extension"),
            Some(EmbedRole::AppExtensions)
        );
        assert_eq!(
            EmbedRole::for_profile("ios:watchkit2-extension"),
            Some(EmbedRole::AppExtensions)
        );
        assert_eq!(EmbedRole::for_profile("general:debug"), None);
    }

    #[test]
    fn test_phases_are_created_lazily() {
        let mut embeds = EmbedPhases::new();
        assert!(embeds.is_empty());

        embeds.add(EmbedRole::AppExtensions, BuildItem::Product(TargetId(1)));
        embeds.add(EmbedRole::AppExtensions, BuildItem::Product(TargetId(1)));

        let phase = embeds.phase(EmbedRole::AppExtensions).unwrap();
        assert_eq!(phase.name.as_deref(), Some(EMBED_APP_EXTENSIONS_PHASE));
        assert_eq!(phase.files.len(), 1);
        assert!(embeds.phase(EmbedRole::WatchContent).is_none());
    }

    #[test]
    fn test_install_moves_phases_in_role_order() {
        let mut project = NativeProject::new();
        let id = project.add_target("App", crate::native::constants::APPLICATION);

        let mut embeds = EmbedPhases::new();
        embeds.add(EmbedRole::AppExtensions, BuildItem::File(FileId(0)));
        embeds.add(EmbedRole::Frameworks, BuildItem::File(FileId(1)));
        embeds.install(project.target_mut(id));

        let names: Vec<_> = project
            .target(id)
            .build_phases
            .iter()
            .map(|p| p.name.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(names, vec![EMBED_FRAMEWORKS_PHASE, EMBED_APP_EXTENSIONS_PHASE]);
        assert!(embeds.is_empty());
    }

    #[test]
    fn test_watch_content_destination() {
        let mut embeds = EmbedPhases::new();
        embeds.add(EmbedRole::WatchContent, BuildItem::Product(TargetId(2)));
        let phase = embeds.phase(EmbedRole::WatchContent).unwrap();
        assert_eq!(
            phase.kind,
            BuildPhaseKind::CopyFiles {
                destination: CopyDestination::ProductsDirectory,
                dst_path: "$(CONTENTS_FOLDER_PATH)/Watch".to_string(),
            }
        );
    }

    #[test]
    fn test_export_embeds_watch_extension_as_app_extension() {
        let targets = [
            target("Watch", &["watch:debug"], &["Ext"]),
            target("Ext", &["watch:debug", "watchkit2-extension"], &[]),
        ];
        let (project, scopes) = embed(&targets, &["Watch", "Ext"]);

        let ext = project.target_by_name("Ext").unwrap();
        let phase = scopes[0].embeds.phase(EmbedRole::AppExtensions).unwrap();
        assert_eq!(phase.files.len(), 1);
        assert_eq!(phase.files[0].item, BuildItem::Product(ext));
        assert_eq!(phase.files[0].attributes, vec![REMOVE_HEADERS_ON_COPY]);
        assert!(scopes[0].embeds.phase(EmbedRole::WatchContent).is_none());
        assert!(scopes[1].embeds.is_empty());
    }

    #[test]
    fn test_export_embeds_watch_app_as_watch_content() {
        let targets = [
            target("App", &["ios:debug"], &["WatchApp"]),
            target("WatchApp", &["application.watchapp2"], &[]),
        ];
        let (project, scopes) = embed(&targets, &["App", "WatchApp"]);

        let phase = scopes[0].embeds.phase(EmbedRole::WatchContent).unwrap();
        assert_eq!(phase.name.as_deref(), Some(EMBED_WATCH_CONTENT_PHASE));
        assert_eq!(
            phase.files[0].item,
            BuildItem::Product(project.target_by_name("WatchApp").unwrap())
        );
        assert!(scopes[0].embeds.phase(EmbedRole::AppExtensions).is_none());
    }

    #[test]
    fn test_export_skips_self_reference() {
        let targets = [target("Ext", &["app-extension"], &["Ext"])];
        let (_, scopes) = embed(&targets, &["Ext"]);
        assert!(scopes[0].embeds.is_empty());
    }

    #[test]
    fn test_export_skips_target_without_role() {
        let targets = [
            target("App", &["ios:debug"], &["Kit"]),
            target("Kit", &["general:debug", "ios:debug"], &[]),
        ];
        let (_, scopes) = embed(&targets, &["App", "Kit"]);
        assert!(scopes[0].embeds.is_empty());
    }

    #[test]
    fn test_export_skips_target_missing_from_project() {
        let targets = [
            target("App", &["ios:debug"], &["Ext"]),
            target("Ext", &["app-extension"], &[]),
        ];
        let (_, scopes) = embed(&targets, &["App"]);
        assert!(scopes[0].embeds.is_empty());
    }

    #[test]
    fn test_role_of_uses_first_configuration_only() {
        let mut ext = target("Ext", &["general:debug"], &[]);
        ext.configurations
            .push(TargetConfiguration::new("Release", vec!["app-extension".to_string()]));
        assert_eq!(role_of(&ext), None);
        assert_eq!(role_of(&Target::new("Bare", Some(APPLICATION))), None);
    }
}
