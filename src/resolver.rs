//! # Parent Template Resolution
//!
//! This module provides the `TemplateResolver`, which turns a
//! `ParentReference` into the parent's `TemplateDocument`.
//!
//! ## Design
//!
//! The resolver separates *what* is fetched from *how* it is fetched through
//! two traits:
//!
//! - **`RemoteOperations`**: retrieves the body of a devfile served at a URI.
//!
//! - **`ClusterOperations`**: reads a `DevWorkspaceTemplate` resource by name
//!   and namespace.
//!
//! The default implementations talk HTTP through `ureq`. Tests replace them
//! with in-memory mocks through `TemplateResolver::with_operations`.
//!
//! Resolution is a single step: the returned document keeps its own parent
//! reference, and walking further up the chain is the flattener's job.

use log::debug;

use crate::cluster::KubeApiClient;
use crate::config::ClusterConfig;
use crate::error::{Error, Result};
use crate::schema::{self, ParentReference, TemplateDocument};

/// Trait for retrieving remote devfiles - allows mocking in tests
pub trait RemoteOperations: Send + Sync {
    /// Fetch the raw body served at `uri`.
    fn fetch(&self, uri: &str) -> Result<String>;
}

/// Trait for reading cluster-stored templates - allows mocking in tests
pub trait ClusterOperations: Send + Sync {
    /// Read the `DevWorkspaceTemplate` named `name` in `namespace` and return
    /// its spec.
    fn get_template(&self, name: &str, namespace: &str) -> Result<TemplateDocument>;
}

/// The default `RemoteOperations`, performing plain HTTP GET requests.
pub struct HttpRemoteOperations {
    agent: ureq::Agent,
}

impl HttpRemoteOperations {
    pub fn new() -> Self {
        Self::with_agent(ureq::Agent::new())
    }

    /// Use a preconfigured agent, e.g. one with timeouts or a proxy.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for HttpRemoteOperations {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteOperations for HttpRemoteOperations {
    fn fetch(&self, uri: &str) -> Result<String> {
        crate::remote::fetch_document(&self.agent, uri)
    }
}

impl ClusterOperations for KubeApiClient {
    fn get_template(&self, name: &str, namespace: &str) -> Result<TemplateDocument> {
        KubeApiClient::get_template(self, name, namespace)
    }
}

/// `ClusterOperations` used when no cluster connection is configured.
///
/// Every lookup fails, so templates with remote parents still flatten.
pub struct UnconfiguredCluster {
    reason: String,
}

impl UnconfiguredCluster {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ClusterOperations for UnconfiguredCluster {
    fn get_template(&self, name: &str, namespace: &str) -> Result<TemplateDocument> {
        Err(Error::ClusterConfig {
            message: format!(
                "cannot read DevWorkspaceTemplate {}/{}: {}",
                namespace, name, self.reason
            ),
        })
    }
}

/// Resolves parent references to documents.
pub struct TemplateResolver {
    remote_ops: Box<dyn RemoteOperations>,
    cluster_ops: Box<dyn ClusterOperations>,
}

impl TemplateResolver {
    /// Creates a resolver using HTTP for remote parents and, when a cluster
    /// configuration is given, the Kubernetes API for cluster parents.
    pub fn new(cluster: Option<ClusterConfig>) -> Result<Self> {
        let cluster_ops: Box<dyn ClusterOperations> = match cluster {
            Some(config) => Box::new(KubeApiClient::new(config)?),
            None => Box::new(UnconfiguredCluster::new("no cluster connection configured")),
        };
        Ok(Self {
            remote_ops: Box::new(HttpRemoteOperations::new()),
            cluster_ops,
        })
    }

    /// Creates a resolver with custom `RemoteOperations` and
    /// `ClusterOperations` implementations.
    pub fn with_operations(
        remote_ops: Box<dyn RemoteOperations>,
        cluster_ops: Box<dyn ClusterOperations>,
    ) -> Self {
        Self {
            remote_ops,
            cluster_ops,
        }
    }

    /// Fetch the document `parent` points at.
    ///
    /// Cluster references without a namespace are looked up in
    /// `default_namespace`.
    pub fn resolve(&self, parent: &ParentReference, default_namespace: &str) -> Result<TemplateDocument> {
        match parent {
            ParentReference::Uri(uri) => {
                let body = self.remote_ops.fetch(uri)?;
                debug!("Fetched {} bytes from {}", body.len(), uri);
                schema::parse_remote(&body, uri)
            }
            ParentReference::Kubernetes(location) => {
                let namespace = location.effective_namespace(default_namespace);
                self.cluster_ops.get_template(&location.name, namespace)
            }
        }
    }
}
