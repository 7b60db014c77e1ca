//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a template
//! file without resolving its parents.
//!
//! ## Functionality
//!
//! - **Strict Decoding**: Unknown fields, malformed values and entries that
//!   set more than one kind are rejected.
//! - **Summary**: Reports the parent reference and the number of commands,
//!   components and projects.
//! - **Duplicate Identities**: Warns about entries sharing an identity key;
//!   a child entry with that key would replace all of them at once.
//!
//! This command never contacts the network.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use devfile_flatten::merge::Identified;
use devfile_flatten::output::{emoji, OutputConfig};
use devfile_flatten::schema;

/// Check that a template file decodes, without resolving parents
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Template file: a bare template or a DevWorkspaceTemplate resource
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

/// Identity keys that occur more than once in `entries`, in first-seen order.
pub fn duplicate_identities<T: Identified>(entries: &[T]) -> Vec<String> {
    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (index, entry) in entries.iter().enumerate() {
        if let Some(id) = entry.identity() {
            counts.entry(id).or_insert((index, 0)).1 += 1;
        }
    }
    let mut duplicates: Vec<(usize, String)> = counts
        .into_iter()
        .filter(|(_, (_, count))| *count > 1)
        .map(|(id, (first, _))| (first, id))
        .collect();
    duplicates.sort();
    duplicates.into_iter().map(|(_, id)| id).collect()
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Validating template: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.file.display()
    );

    let parsed = match schema::from_file(&args.file) {
        Ok(parsed) => {
            println!("{} Template parsed successfully", emoji(&out, "✅", "[OK]"));
            parsed
        }
        Err(e) => {
            println!("{} Template parsing failed: {}", emoji(&out, "❌", "[ERR]"), e);
            return Err(anyhow::anyhow!("Template parsing failed: {}", e));
        }
    };
    let template = &parsed.template;

    println!("\n{} Template Summary:", emoji(&out, "📊", "[INFO]"));
    match &template.parent {
        Some(parent) => println!("   Parent: {}", parent),
        None => println!("   Parent: none"),
    }
    if let Some(namespace) = &parsed.namespace {
        println!("   Namespace: {}", namespace);
    }
    println!("   Commands: {}", template.commands.len());
    println!("   Components: {}", template.components.len());
    println!("   Projects: {}", template.projects.len());

    let mut duplicates = Vec::new();
    duplicates.extend(
        duplicate_identities(&template.commands)
            .into_iter()
            .map(|id| ("command", id)),
    );
    duplicates.extend(
        duplicate_identities(&template.components)
            .into_iter()
            .map(|id| ("component", id)),
    );
    duplicates.extend(
        duplicate_identities(&template.projects)
            .into_iter()
            .map(|id| ("project", id)),
    );

    println!("\n{} Validation Result:", emoji(&out, "🎯", "[RESULT]"));
    if duplicates.is_empty() {
        println!("{} Template is valid", emoji(&out, "✅", "[OK]"));
        return Ok(());
    }

    for (list, id) in &duplicates {
        println!(
            "{} Duplicate {} identity '{}'",
            emoji(&out, "⚠️", "[WARN]"),
            list,
            id
        );
    }
    if args.strict {
        return Err(anyhow::anyhow!(
            "Template has {} duplicate identity(ies) (strict mode)",
            duplicates.len()
        ));
    }
    println!("{} Template is valid with warnings", emoji(&out, "⚠️", "[WARN]"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use devfile_flatten::schema::{GitSource, Project, ProjectSource};

    fn project(name: &str) -> Project {
        Project::new(
            name,
            ProjectSource::Git(GitSource {
                location: format!("https://example.com/{}.git", name),
                branch: String::new(),
            }),
        )
    }

    #[test]
    fn test_duplicate_identities_in_first_seen_order() {
        let projects = vec![
            project("b"),
            project("a"),
            project("b"),
            project("c"),
            project("a"),
        ];
        assert_eq!(duplicate_identities(&projects), vec!["b", "a"]);
    }

    #[test]
    fn test_no_duplicates() {
        let projects = vec![project("a"), project("b")];
        assert!(duplicate_identities(&projects).is_empty());
    }
}
