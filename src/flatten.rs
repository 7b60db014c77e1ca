//! Walking a template's parent chain
//!
//! Flattening repeatedly replaces the working document with "working merged
//! into its parent" until no parent reference remains:
//!
//! 1.  **Guard**: the parent location is checked against, then added to, the
//!     walk's `VisitedSet`. A repeat visit aborts with `Error::Cycle`.
//! 2.  **Resolve**: the parent document is fetched. It may itself have a
//!     parent, which the next iteration handles.
//! 3.  **Merge**: the working document is merged into the parent; the result
//!     has no parent of its own, so the parent's parent is taken from the
//!     resolved document before merging.
//!
//! Any failure ends the walk and is returned unchanged. No partially
//! flattened document is ever returned.

use log::debug;

use crate::error::Result;
use crate::guard::VisitedSet;
use crate::merge::merge;
use crate::resolver::TemplateResolver;
use crate::schema::{ParentReference, TemplateDocument};

/// A flattened document together with the parents that were merged into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened {
    pub template: TemplateDocument,
    /// Parent references in the order they were resolved, nearest first.
    pub chain: Vec<ParentReference>,
}

/// Drives the resolve/merge loop over a `TemplateResolver`.
pub struct Flattener {
    resolver: TemplateResolver,
}

impl Flattener {
    pub fn new(resolver: TemplateResolver) -> Self {
        Self { resolver }
    }

    /// Flatten `template`, resolving cluster parents without a namespace in
    /// `namespace`.
    pub fn flatten(&self, template: TemplateDocument, namespace: &str) -> Result<TemplateDocument> {
        self.flatten_traced(template, namespace)
            .map(|flattened| flattened.template)
    }

    /// Flatten an optional template. An absent template stays absent.
    pub fn flatten_optional(
        &self,
        template: Option<TemplateDocument>,
        namespace: &str,
    ) -> Result<Option<TemplateDocument>> {
        template
            .map(|template| self.flatten(template, namespace))
            .transpose()
    }

    /// Flatten `template` and also report which parents were merged.
    pub fn flatten_traced(&self, template: TemplateDocument, namespace: &str) -> Result<Flattened> {
        let mut visited = VisitedSet::new();
        let mut chain = Vec::new();
        let mut working = template;

        while let Some(parent_ref) = working.parent.clone() {
            visited.check_and_record(&parent_ref, namespace)?;
            debug!("Resolving parent {}", parent_ref);

            let mut parent = self.resolver.resolve(&parent_ref, namespace)?;
            let grandparent = parent.parent.take();

            working = merge(&working, &parent);
            working.parent = grandparent;
            chain.push(parent_ref);
        }

        debug!("Flattened template after resolving {} parent(s)", chain.len());
        Ok(Flattened {
            template: working,
            chain,
        })
    }
}
