//! CLI argument parsing and command dispatch

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use crate::commands;

/// Devfile Flatten - Resolve and merge devfile template parent chains
#[derive(Parser, Debug)]
#[command(name = "devfile-flatten")]
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
    /// Resolve a template's parents and print the merged template
    Flatten(commands::flatten::FlattenArgs),

    /// Flatten a template and print it in the legacy devfile schema
    Translate(commands::translate::TranslateArgs),

    /// Check that a template file decodes, without resolving parents
    Validate(commands::validate::ValidateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level)?;

        match self.command {
            Commands::Flatten(args) => commands::flatten::execute(args, &self.color),
            Commands::Translate(args) => commands::translate::execute(args, &self.color),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
        }
    }
}

/// Log to stderr at `level`. Directives in `RUST_LOG` take precedence.
fn init_logging(level: &str) -> Result<()> {
    let filter: log::LevelFilter = level
        .parse()
        .map_err(|_| anyhow!("Invalid log level '{}'", level))?;

    env_logger::Builder::new()
        .filter_level(filter)
        .format_timestamp(None)
        .parse_default_env()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
