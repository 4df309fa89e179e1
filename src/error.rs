//! # Error Handling
//!
//! This module defines the centralized error type for `specweave`. It uses the
//! `thiserror` library to create an `Error` enum covering every fatal failure
//! mode of a transform.
//!
//! ## Fatal vs. recoverable
//!
//! Only *structural* failures are represented here: an unrecognized input
//! file, a specification without configurations, a target without a product
//! type, a native project that cannot be opened, and wrapped I/O or parsing
//! failures. They abort the whole transform and propagate unchanged to the
//! caller.
//!
//! Recoverable conditions (an unknown profile, a missing settings file, an
//! unresolvable scheme target) are never turned into an `Error`. They are
//! reported through [`crate::diagnostics::Diagnostics`] at the component that
//! detects them and the transform continues with a reduced result.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for specweave operations
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not select a transform direction.
    #[error("Unsupported input file: {}{}", path.display(), hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    UnsupportedInput {
        path: PathBuf,
        /// Optional hint listing the accepted inputs
        hint: Option<String>,
    },

    /// The specification declares no build configuration at all.
    #[error("Invalid specification: project should have at least one configuration")]
    MissingConfigurations,

    /// A specification entity lacks a field the transform cannot do without.
    #[error("Invalid specification: {entity} '{name}' is missing '{field}'")]
    MissingField {
        entity: String,
        name: String,
        field: String,
    },

    /// A specification document could not be interpreted.
    #[error("Specification parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    SpecParse {
        message: String,
        /// Optional hint for how to fix the document
        hint: Option<String>,
    },

    /// A native project document could not be opened or written.
    #[error("Native project error for {}: {message}", path.display())]
    NativeProject { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A directory traversal error, wrapped from `walkdir::Error`.
    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// A semantic versioning parsing error, wrapped from `semver::Error`.
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unsupported_input() {
        let error = Error::UnsupportedInput {
            path: PathBuf::from("project.txt"),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Unsupported input file"));
        assert!(display.contains("project.txt"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_unsupported_input_with_hint() {
        let error = Error::UnsupportedInput {
            path: PathBuf::from("project.txt"),
            hint: Some("expected .xcodeproj, .yml, .yaml, .json or Specfile".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("hint:"));
        assert!(display.contains(".xcodeproj"));
    }

    #[test]
    fn test_error_display_missing_field() {
        let error = Error::MissingField {
            entity: "target".to_string(),
            name: "App".to_string(),
            field: "type".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("target 'App'"));
        assert!(display.contains("'type'"));
    }

    #[test]
    fn test_error_display_missing_configurations() {
        let display = format!("{}", Error::MissingConfigurations);
        assert!(display.contains("at least one configuration"));
    }

    #[test]
    fn test_error_display_native_project() {
        let error = Error::NativeProject {
            path: PathBuf::from("Vendor.xcodeproj"),
            message: "not found".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Vendor.xcodeproj"));
        assert!(display.contains("not found"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML parsing error"));
    }

    #[test]
    fn test_error_from_semver_error() {
        let semver_error = semver::Version::parse("three").unwrap_err();
        let error: Error = semver_error.into();
        assert!(format!("{}", error).contains("Semver parsing error"));
    }
}
