//! Cycle detection for the parent walk
//!
//! Every parent location reached while flattening one template is recorded
//! here. Remote URIs and cluster locations live in separate sets, so a URI and
//! a resource name that happen to look alike never collide. Reaching a
//! recorded location again means the chain loops back on itself, which is
//! fatal for the walk.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::schema::{ClusterLocation, ParentReference};

/// Locations already visited during one flattening walk.
///
/// Each walk owns its own set; nothing is shared between calls.
#[derive(Debug, Default)]
pub struct VisitedSet {
    uris: HashSet<String>,
    locations: HashSet<ClusterLocation>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `Error::Cycle` if `parent` was already visited, otherwise
    /// record it.
    ///
    /// Cluster locations are recorded with their namespace resolved against
    /// `default_namespace`, so `base` and `ns1/base` are the same location
    /// when flattening in `ns1`. The location is recorded before it is
    /// resolved, so a failed fetch still counts as a visit.
    pub fn check_and_record(&mut self, parent: &ParentReference, default_namespace: &str) -> Result<()> {
        match parent {
            ParentReference::Uri(uri) => {
                if !self.uris.insert(uri.clone()) {
                    return Err(Error::Cycle {
                        location: uri.clone(),
                    });
                }
            }
            ParentReference::Kubernetes(location) => {
                let resolved = ClusterLocation::new(
                    location.name.clone(),
                    location.effective_namespace(default_namespace),
                );
                if self.locations.contains(&resolved) {
                    return Err(Error::Cycle {
                        location: ParentReference::Kubernetes(resolved).to_string(),
                    });
                }
                self.locations.insert(resolved);
            }
        }
        Ok(())
    }

    /// Number of locations recorded so far.
    pub fn len(&self) -> usize {
        self.uris.len() + self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
