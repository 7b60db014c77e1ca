//! Event filtering for workspace routing objects
//!
//! A routing object names a routing class. A controller only handles the
//! classes it has a solver for; events for any other class are ignored,
//! except deletions, which always pass so finalizers can be removed.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Computes the routing for workspaces of one routing class.
pub trait RoutingSolver: Send + Sync {
    /// The routing class this solver handles.
    fn routing_class(&self) -> &str;
}

/// Looks up the solver for a routing class.
///
/// Returns `Error::RoutingNotSupported` when no solver handles the class.
/// Any other error means the lookup itself failed.
pub type RoutingSolverLookup = dyn Fn(&str) -> Result<Arc<dyn RoutingSolver>> + Send + Sync;

/// A fixed set of solvers keyed by routing class.
#[derive(Default, Clone)]
pub struct SolverRegistry {
    solvers: HashMap<String, Arc<dyn RoutingSolver>>,
}

impl SolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, solver: Arc<dyn RoutingSolver>) {
        self.solvers
            .insert(solver.routing_class().to_string(), solver);
    }

    pub fn get_solver(&self, routing_class: &str) -> Result<Arc<dyn RoutingSolver>> {
        self.solvers
            .get(routing_class)
            .cloned()
            .ok_or_else(|| Error::RoutingNotSupported {
                routing_class: routing_class.to_string(),
            })
    }

    /// Predicates backed by this registry.
    pub fn predicates(self) -> RoutingPredicates {
        RoutingPredicates::new(Box::new(move |routing_class: &str| {
            self.get_solver(routing_class)
        }))
    }
}

/// Decides which routing events a controller should process.
///
/// Each event carries the routing class of the object it concerns, or `None`
/// when the object is not a routing object. Non-routing objects always pass.
pub struct RoutingPredicates {
    lookup: Box<RoutingSolverLookup>,
}

impl RoutingPredicates {
    pub fn new(lookup: Box<RoutingSolverLookup>) -> Self {
        Self { lookup }
    }

    pub fn create(&self, routing_class: Option<&str>) -> bool {
        self.is_supported(routing_class)
    }

    /// Only the new state of the object is consulted.
    pub fn update(&self, new_routing_class: Option<&str>) -> bool {
        self.is_supported(new_routing_class)
    }

    pub fn generic(&self, routing_class: Option<&str>) -> bool {
        self.is_supported(routing_class)
    }

    /// Deletions always pass so finalizers get removed.
    pub fn delete(&self, _routing_class: Option<&str>) -> bool {
        true
    }

    fn is_supported(&self, routing_class: Option<&str>) -> bool {
        match routing_class {
            Some(class) => !matches!(
                (self.lookup)(class),
                Err(Error::RoutingNotSupported { .. })
            ),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BasicSolver;

    impl RoutingSolver for BasicSolver {
        fn routing_class(&self) -> &str {
            "basic"
        }
    }

    fn predicates() -> RoutingPredicates {
        let mut registry = SolverRegistry::new();
        registry.register(Arc::new(BasicSolver));
        registry.predicates()
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = SolverRegistry::new();
        registry.register(Arc::new(BasicSolver));
        assert_eq!(registry.get_solver("basic").unwrap().routing_class(), "basic");
        let err = registry.get_solver("openshift-oauth").err().unwrap();
        assert_eq!(
            err.to_string(),
            "routing class 'openshift-oauth' is not supported"
        );
    }

    #[test]
    fn test_supported_class_passes() {
        let predicates = predicates();
        assert!(predicates.create(Some("basic")));
        assert!(predicates.update(Some("basic")));
        assert!(predicates.generic(Some("basic")));
    }

    #[test]
    fn test_unsupported_class_is_filtered() {
        let predicates = predicates();
        assert!(!predicates.create(Some("cluster-tls")));
        assert!(!predicates.update(Some("cluster-tls")));
        assert!(!predicates.generic(Some("cluster-tls")));
    }

    #[test]
    fn test_delete_always_passes() {
        let predicates = predicates();
        assert!(predicates.delete(Some("cluster-tls")));
        assert!(predicates.delete(Some("basic")));
        assert!(predicates.delete(None));
    }

    #[test]
    fn test_non_routing_objects_pass() {
        let predicates = predicates();
        assert!(predicates.create(None));
        assert!(predicates.update(None));
        assert!(predicates.generic(None));
    }

    #[test]
    fn test_other_lookup_errors_do_not_filter() {
        let predicates = RoutingPredicates::new(Box::new(|_: &str| -> Result<Arc<dyn RoutingSolver>> {
            Err(Error::ClusterConfig {
                message: "solver setup failed".to_string(),
            })
        }));
        assert!(predicates.create(Some("basic")));
        assert!(predicates.update(Some("basic")));
    }
}
