//! # Output Configuration
//!
//! Controls how the CLI renders diagnostics and summaries. Colors follow the
//! `--color=always|never|auto` flag; in auto mode the usual environment
//! conventions apply:
//!
//! - `NO_COLOR` disables colors when set (https://no-color.org/)
//! - `CLICOLOR=0` disables colors
//! - `CLICOLOR_FORCE=1` forces colors even when stdout is not a TTY
//! - `TERM=dumb` disables colors
//!
//! ```rust,ignore
//! use specweave::output::{render_diagnostic, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! for diagnostic in diagnostics.drain() {
//!     eprintln!("{}", render_diagnostic(&config, &diagnostic));
//! }
//! ```

use std::env;

use console::style;

use crate::diagnostics::{Diagnostic, Severity};

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: `always` forces colors on
    /// (overriding `NO_COLOR`), `never` forces them off and anything else
    /// detects support from the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colors, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stderr().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// One diagnostic as a single line, `warning:` or `note:` prefixed
pub fn render_diagnostic(config: &OutputConfig, diagnostic: &Diagnostic) -> String {
    let label = match diagnostic.severity {
        Severity::Warning => style("warning:").yellow().bold(),
        Severity::Note => style("note:").cyan(),
    };
    format!(
        "{} {}",
        label.force_styling(config.use_color),
        diagnostic.message
    )
}

/// Closing line of a run: what was produced and how many warnings it took
pub fn render_summary(config: &OutputConfig, outputs: usize, warnings: usize, dry_run: bool) -> String {
    let verb = if dry_run { "Would write" } else { "Wrote" };
    let documents = if outputs == 1 { "document" } else { "documents" };
    let head = style(format!("{} {} {}", verb, outputs, documents))
        .green()
        .bold()
        .force_styling(config.use_color);
    match warnings {
        0 => format!("{}", head),
        1 => format!("{} (1 warning)", head),
        n => format!("{} ({} warnings)", head, n),
    }
}
