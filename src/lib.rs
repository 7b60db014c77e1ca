//! # Devfile Template Flattening
//!
//! This library resolves a devfile template's parent chain and merges every
//! ancestor into a single self-contained document. It is used by the
//! `devfile-flatten` command-line tool but can also be embedded in a
//! workspace controller.
//!
//! ## Quick Example
//!
//! ```
//! use devfile_flatten::merge::merge;
//! use devfile_flatten::schema::parse_template;
//!
//! let parent = parse_template(
//!     "projects:\n  - name: app\n    git:\n      location: https://example.com/a.git\n",
//!     "parent",
//! )
//! .unwrap();
//! let child = parse_template(
//!     "projects:\n  - name: app\n    git:\n      location: https://example.com/fork.git\n",
//!     "child",
//! )
//! .unwrap();
//!
//! let merged = merge(&child.template, &parent.template);
//! assert_eq!(merged.projects.len(), 1);
//! assert!(merged.parent.is_none());
//! ```
//!
//! ## Core Concepts
//!
//! - **Schema (`schema`)**: The template document model and its strict
//!   decoding from YAML or from a `DevWorkspaceTemplate` resource.
//! - **Resolution (`resolver`, `remote`, `cluster`)**: Turning a parent
//!   reference into the parent's document, either by HTTP GET or by reading a
//!   cluster resource.
//! - **Cycle guard (`guard`)**: Per-walk record of visited parent locations.
//! - **Merging (`merge`)**: Child-over-parent reconciliation of commands,
//!   components and projects by identity key.
//! - **Flattening (`flatten`)**: The resolve/merge loop over the whole chain.
//! - **Legacy translation (`legacy`)**: Projection of a flattened template
//!   into the older devfile schema.
//! - **Routing predicates (`routing`)**: Event filtering by routing class.
//!
//! ## Execution Flow
//!
//! 1.  **Parse**: Decode the input template.
//! 2.  **Guard**: Record the parent location, failing on a repeat visit.
//! 3.  **Resolve**: Fetch the parent document.
//! 4.  **Merge**: Merge the working document into the parent; continue with
//!     the parent's own parent until none remains.
//! 5.  **Translate** (optional): Produce the legacy document.

pub mod cluster;
pub mod config;
pub mod error;
pub mod flatten;
pub mod guard;
pub mod legacy;
pub mod merge;
pub mod output;
pub mod remote;
pub mod resolver;
pub mod routing;
pub mod schema;

#[cfg(test)]
mod merge_proptest;
