//! # Translate Command Implementation
//!
//! Flattens a template and prints it in the legacy devfile schema. Entries
//! without a legacy form are dropped; `--report` lists them on stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use devfile_flatten::legacy;
use devfile_flatten::output::{emoji, render, OutputConfig, OutputFormat};

use super::ClusterArgs;

/// Flatten a template and print it in the legacy devfile schema
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Template file: a bare template or a DevWorkspaceTemplate resource
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Namespace for cluster parents that do not name one
    #[arg(short, long, value_name = "NS")]
    pub namespace: Option<String>,

    /// Output format (yaml, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "yaml")]
    pub output: OutputFormat,

    /// List entries dropped during translation on stderr
    #[arg(long)]
    pub report: bool,

    #[command(flatten)]
    pub cluster: ClusterArgs,
}

/// Execute the `translate` command.
pub fn execute(args: TranslateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let flattened = super::load_and_flatten(&args.file, args.namespace, &args.cluster)?;

    let document = if args.report {
        let translation = legacy::translate_with_report(&flattened.template);
        if translation.dropped.is_empty() {
            eprintln!("{} Nothing dropped", emoji(&out, "✅", "[OK]"));
        } else {
            eprintln!(
                "{} Dropped {} entry(ies) without a legacy form:",
                emoji(&out, "⚠️", "[WARN]"),
                translation.dropped.len()
            );
            for entry in &translation.dropped {
                eprintln!("   - {}", entry);
            }
        }
        translation.document
    } else {
        legacy::translate(&flattened.template)
    };

    print!("{}", render(&document, args.output)?);
    Ok(())
}
