//! CLI argument parsing and command dispatch

use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;
use specweave::output::OutputConfig;

/// Specweave - Convert between native projects and declarative specifications
#[derive(Parser, Debug)]
#[command(name = "specweave")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a specification from a project, or projects from a specification
    Generate(commands::generate::GenerateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let level = LevelFilter::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("Invalid log level: {}", self.log_level))?;
        // Ignored when a logger is already installed
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .format_target(false)
            .try_init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
