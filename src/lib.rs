//! # Specweave Library
//!
//! This library converts in both directions between native IDE project
//! documents (targets, build phases, file references, build configurations,
//! schemes) and declarative specifications that describe the same project
//! through named settings profiles plus explicit overrides. It backs the
//! `specweave` command-line tool but has no dependency on it.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//!
//! use specweave::diagnostics::Diagnostics;
//! use specweave::native::MemoryNativeStore;
//! use specweave::profiles::MemoryProfileStore;
//! use specweave::spec;
//! use specweave::transform::Transformer;
//!
//! let spec = spec::parse(r#"
//! version: 3.0.0
//! configurations:
//!   - name: Debug
//!     type: debug
//!     profiles: ["general:debug", "ios:debug"]
//! targets:
//!   - name: App
//!     type: ":application"
//! "#).unwrap();
//!
//! let profiles = MemoryProfileStore::builtin();
//! let store = MemoryNativeStore::new();
//! let diagnostics = Diagnostics::new();
//! let transformer = Transformer::new(&profiles, &store, &diagnostics);
//!
//! let outputs = transformer.export(&spec, &[], Path::new("out")).unwrap();
//! assert_eq!(outputs.len(), 1);
//! assert!(diagnostics.is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! - **Specification (`spec`)**: the declarative document, parsed from YAML
//!   or JSON.
//! - **Native model (`native`)**: an arena-backed project graph plus the
//!   [`native::NativeStore`] that opens and persists it.
//! - **Profiles (`profiles`)**: named bundles of default build settings.
//! - **Components (`components`)**: one pair of import/export functions per
//!   facet of the project (configurations, sources, references, schemes...).
//! - **Diagnostics (`diagnostics`)**: recoverable problems, collected instead
//!   of failing the transform.
//!
//! ## Execution Flow
//!
//! [`transform::Transformer`] picks the direction from the input path:
//!
//! 1.  **Import**: open the native project, convert configurations, targets
//!     and schemes, lint the result, produce one specification.
//! 2.  **Export**: expand variants, then for each resulting project convert
//!     configurations, create every target shell, fill in target facets,
//!     wire cross-target embeds, add script phases and convert schemes.
//!
//! Outputs are persisted only after the whole transform succeeded.

pub mod components;
pub mod diagnostics;
pub mod error;
pub mod native;
pub mod output;
pub mod profiles;
pub mod spec;
pub mod transform;
