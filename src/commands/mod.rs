//! # CLI Command Implementations
//!
//! One module per subcommand. Each holds an `Args` struct derived with `clap`
//! and an `execute` function that calls into the `specweave` library.

pub mod completions;
pub mod generate;
