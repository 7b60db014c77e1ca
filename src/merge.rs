//! Child-into-parent template merging
//!
//! A child template overrides its parent entry by entry. Each of the three
//! lists is reconciled independently:
//!
//! 1. The parent's list is the base, in its original order.
//! 2. A child entry whose identity matches a base entry replaces it in place.
//!    Replacement is whole-entry; fields are never merged.
//! 3. A child entry with no identity, or an unmatched one, is appended.
//!
//! The merged document never has a parent: once merged, the parent link has
//! been consumed.

use std::collections::HashMap;

use crate::schema::{Command, Component, Project, TemplateDocument};

/// An entry that may carry an identity used to match it against parent entries.
pub trait Identified {
    /// The identity key, or `None` when the entry can only be appended.
    fn identity(&self) -> Option<String>;
}

impl Identified for Command {
    fn identity(&self) -> Option<String> {
        match self {
            Command::Exec(exec) => (!exec.alias.is_empty()).then(|| exec.alias.clone()),
            _ => None,
        }
    }
}

impl Identified for Component {
    fn identity(&self) -> Option<String> {
        let prefixed = |prefix: &str, value: &str| {
            (!value.is_empty()).then(|| format!("{}/{}", prefix, value))
        };
        match self {
            Component::CheEditor(editor) => prefixed("CheEditor.Alias", &editor.alias),
            Component::ChePlugin(plugin) => prefixed("ChePlugin.Alias", &plugin.alias)
                .or_else(|| {
                    plugin
                        .registry_entry
                        .as_ref()
                        .and_then(|entry| prefixed("ChePlugin.RegistryEntry", &entry.id))
                })
                .or_else(|| prefixed("ChePlugin.Uri", &plugin.uri)),
            Component::Container(container) => prefixed("Container.Alias", &container.alias)
                .or_else(|| prefixed("Container.Name", &container.name)),
            Component::Volume(_) | Component::Kubernetes(_) | Component::Openshift(_) => None,
        }
    }
}

impl Identified for Project {
    fn identity(&self) -> Option<String> {
        (!self.name.is_empty()).then(|| self.name.clone())
    }
}

/// Merge `child` into `parent`, producing a new document without a parent.
///
/// Neither input is modified.
pub fn merge(child: &TemplateDocument, parent: &TemplateDocument) -> TemplateDocument {
    TemplateDocument {
        parent: None,
        commands: merge_entries(&parent.commands, &child.commands),
        components: merge_entries(&parent.components, &child.components),
        projects: merge_entries(&parent.projects, &child.projects),
    }
}

/// Reconcile one entry list: replace-by-identity, otherwise append.
///
/// The index maps each identity to every position holding it, so a base list
/// that already contains duplicates has all of them replaced.
pub fn merge_entries<T: Identified + Clone>(base: &[T], overrides: &[T]) -> Vec<T> {
    let mut merged: Vec<T> = base.to_vec();
    let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, entry) in merged.iter().enumerate() {
        if let Some(id) = entry.identity() {
            positions.entry(id).or_default().push(index);
        }
    }

    for entry in overrides {
        let id = entry.identity();
        let slots = id.as_ref().and_then(|id| positions.get(id)).cloned();
        match slots {
            Some(slots) => {
                for slot in slots {
                    if let Some(existing) = merged.get_mut(slot) {
                        *existing = entry.clone();
                    }
                }
            }
            None => {
                if let Some(id) = id {
                    positions.insert(id, vec![merged.len()]);
                }
                merged.push(entry.clone());
            }
        }
    }

    merged
}
