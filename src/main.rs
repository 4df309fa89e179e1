//! # Specweave CLI
//!
//! Binary entry point for the `specweave` command-line tool. It parses
//! arguments with `clap`, runs the selected command and turns fatal errors
//! into a non-zero exit status. All transform logic lives in the library
//! crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
