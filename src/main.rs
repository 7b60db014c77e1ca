//! # Devfile Flatten CLI
//!
//! This is the binary entry point for the `devfile-flatten` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging.
//! - Executing the appropriate command and turning library errors into
//!   user-facing messages and a non-zero exit status.
//!
//! The flattening logic itself lives in the library crate; the binary is a
//! thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
