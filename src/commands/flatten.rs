//! # Flatten Command Implementation
//!
//! Reads a template, resolves its whole parent chain and prints the merged
//! template on stdout. Progress goes to stderr so the output can be piped.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use devfile_flatten::output::{emoji, render, OutputConfig, OutputFormat};

use super::ClusterArgs;

/// Resolve a template's parents and print the merged template
#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// Template file: a bare template or a DevWorkspaceTemplate resource
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Namespace for cluster parents that do not name one
    #[arg(short, long, value_name = "NS")]
    pub namespace: Option<String>,

    /// Output format (yaml, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "yaml")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub cluster: ClusterArgs,
}

/// Execute the `flatten` command.
pub fn execute(args: FlattenArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let flattened = super::load_and_flatten(&args.file, args.namespace, &args.cluster)?;

    for parent in &flattened.chain {
        eprintln!("{} Merged parent {}", emoji(&out, "🔗", "[PARENT]"), parent);
    }
    eprintln!(
        "{} Flattened {} ({} parent(s))",
        emoji(&out, "✅", "[OK]"),
        args.file.display(),
        flattened.chain.len()
    );

    print!("{}", render(&flattened.template, args.output)?);
    Ok(())
}
