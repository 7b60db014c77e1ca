//! # CLI Command Implementations
//!
//! Each subcommand of `devfile-flatten` lives in its own module with an
//! `Args` struct derived with `clap` and an `execute` function.
//!
//! Options shared by the commands that resolve parents are collected in
//! `ClusterArgs`, along with the helpers that turn a template file into a
//! flattened document.

pub mod flatten;
pub mod translate;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use log::debug;

use devfile_flatten::config::ClusterConfig;
use devfile_flatten::flatten::{Flattened, Flattener};
use devfile_flatten::resolver::TemplateResolver;
use devfile_flatten::schema::{self, ParsedTemplate};

/// Namespace used when nothing else names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Connection to the cluster holding `DevWorkspaceTemplate` parents.
///
/// Without `--server`, in-cluster service account credentials are used when
/// available. When neither is present, only URI parents can be resolved.
#[derive(Args, Debug, Clone, Default)]
pub struct ClusterArgs {
    /// Kubernetes API server URL
    #[arg(long, value_name = "URL", env = "DEVFILE_FLATTEN_SERVER")]
    pub server: Option<String>,

    /// Bearer token for the API server
    #[arg(
        long,
        value_name = "TOKEN",
        env = "DEVFILE_FLATTEN_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// PEM bundle of CA certificates trusted for the API server
    #[arg(long, value_name = "FILE", env = "DEVFILE_FLATTEN_CA_CERT")]
    pub ca_cert: Option<PathBuf>,
}

impl ClusterArgs {
    /// The cluster configuration from flags, else from the pod environment.
    pub fn cluster_config(&self) -> Option<ClusterConfig> {
        if let Some(server) = &self.server {
            let mut config = ClusterConfig::new(server.as_str());
            if let Some(token) = &self.token {
                config = config.with_token(token.as_str());
            }
            if let Some(ca_cert) = &self.ca_cert {
                config = config.with_ca_cert(ca_cert);
            }
            return Some(config);
        }

        match ClusterConfig::in_cluster() {
            Ok(config) => Some(config),
            Err(e) => {
                debug!("No cluster connection: {}", e);
                None
            }
        }
    }
}

/// Pick the namespace for cluster parents without one: the flag, then the
/// template resource's own namespace, then the service account's namespace.
pub fn resolve_namespace(
    flag: Option<String>,
    parsed: &ParsedTemplate,
    cluster: Option<&ClusterConfig>,
) -> String {
    flag.filter(|ns| !ns.is_empty())
        .or_else(|| parsed.namespace.clone())
        .or_else(|| cluster.and_then(|config| config.namespace.clone()))
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
}

/// Read a template file and flatten it.
pub fn load_and_flatten(
    file: &Path,
    namespace: Option<String>,
    cluster: &ClusterArgs,
) -> Result<Flattened> {
    let parsed = schema::from_file(file)
        .with_context(|| format!("Failed to load template {}", file.display()))?;

    let config = cluster.cluster_config();
    let namespace = resolve_namespace(namespace, &parsed, config.as_ref());
    debug!("Flattening {} in namespace {}", file.display(), namespace);

    let resolver = TemplateResolver::new(config).context("Failed to set up template resolution")?;
    Flattener::new(resolver)
        .flatten_traced(parsed.template, &namespace)
        .with_context(|| format!("Failed to flatten {}", file.display()))
}
