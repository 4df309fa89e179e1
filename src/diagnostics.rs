//! # Diagnostics Sink
//!
//! Recoverable problems found during a transform (an unknown profile, a
//! missing settings file, a scheme target that does not exist) are reported
//! here instead of failing the transform. Every entry is also forwarded to the
//! `log` facade so it shows up in the regular log stream.
//!
//! A `Diagnostics` value belongs to exactly one top-level transform. It uses
//! interior mutability so that components can share it by reference while the
//! transform runs; it is not meant to be shared between threads.

use std::cell::RefCell;
use std::fmt;

use log::{info, warn};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational note, e.g. a skipped generate hook
    Note,
    /// Something was dropped or defaulted
    Warning,
}

/// A single non-fatal message produced by a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Note => write!(f, "note: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Collects diagnostics for one transform
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: RefCell<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and mirror it through `log::warn!`
    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.entries.borrow_mut().push(Diagnostic {
            severity: Severity::Warning,
            message,
        });
    }

    /// Record an informational note
    pub fn note(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.entries.borrow_mut().push(Diagnostic {
            severity: Severity::Note,
            message,
        });
    }

    /// Snapshot of everything recorded so far
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    /// Number of warnings (notes excluded)
    pub fn warning_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Take every recorded entry, leaving the sink empty
    pub fn drain(&self) -> Vec<Diagnostic> {
        self.entries.borrow_mut().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_records_entry() {
        let diagnostics = Diagnostics::new();
        diagnostics.warn("profile 'ios:nonexistent' not found");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        let entries = diagnostics.entries();
        assert_eq!(entries[0].severity, Severity::Warning);
        assert!(entries[0].message.contains("ios:nonexistent"));
    }

    #[test]
    fn test_notes_are_not_warnings() {
        let diagnostics = Diagnostics::new();
        diagnostics.note("pre-generate hook skipped");
        diagnostics.warn("something dropped");

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_drain_empties_sink() {
        let diagnostics = Diagnostics::new();
        diagnostics.warn("one");
        diagnostics.warn("two");

        let drained = diagnostics.drain();
        assert_eq!(drained.len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_display_prefix() {
        let d = Diagnostic {
            severity: Severity::Warning,
            message: "missing".to_string(),
        };
        assert_eq!(d.to_string(), "warning: missing");
    }
}
