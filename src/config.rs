//! # Cluster Connection Configuration
//!
//! Parents stored as `DevWorkspaceTemplate` resources are read from the
//! Kubernetes API server. This module describes how to reach it.
//!
//! Two sources are supported:
//!
//! 1.  **Explicit**: `ClusterConfig::new(server)` plus optional bearer token and
//!     CA bundle, e.g. pointing at a `kubectl proxy` endpoint.
//! 2.  **In-cluster**: `ClusterConfig::in_cluster()` reads the standard
//!     `KUBERNETES_SERVICE_HOST`/`KUBERNETES_SERVICE_PORT` variables and the
//!     mounted service-account token, CA bundle and namespace.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory where Kubernetes mounts the pod's service-account credentials.
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// How to reach the cluster API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Base URL of the API server, e.g. `https://10.0.0.1:443`.
    pub server: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// PEM bundle used to verify the server certificate.
    pub ca_cert: Option<PathBuf>,
    /// Namespace the process runs in, when known.
    pub namespace: Option<String>,
}

impl ClusterConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            token: None,
            ca_cert: None,
            namespace: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    /// Build the configuration of the pod this process runs in.
    pub fn in_cluster() -> Result<Self> {
        Self::from_service_account(
            env::var("KUBERNETES_SERVICE_HOST").ok(),
            env::var("KUBERNETES_SERVICE_PORT").ok(),
            Path::new(SERVICE_ACCOUNT_DIR),
        )
    }

    /// Assemble an in-cluster configuration from its raw parts.
    pub fn from_service_account(
        host: Option<String>,
        port: Option<String>,
        account_dir: &Path,
    ) -> Result<Self> {
        let (Some(host), Some(port)) = (
            host.filter(|h| !h.is_empty()),
            port.filter(|p| !p.is_empty()),
        ) else {
            return Err(Error::ClusterConfig {
                message: "KUBERNETES_SERVICE_HOST and KUBERNETES_SERVICE_PORT must be set \
                          when running in a cluster"
                    .to_string(),
            });
        };

        // IPv6 service addresses need brackets in a URL
        let host = if host.contains(':') {
            format!("[{}]", host)
        } else {
            host
        };

        let token_path = account_dir.join("token");
        let token = fs::read_to_string(&token_path).map_err(|e| Error::ClusterConfig {
            message: format!(
                "cannot read service account token {}: {}",
                token_path.display(),
                e
            ),
        })?;

        let ca_path = account_dir.join("ca.crt");
        let ca_cert = ca_path.exists().then_some(ca_path);

        let namespace = fs::read_to_string(account_dir.join("namespace"))
            .ok()
            .map(|ns| ns.trim().to_string())
            .filter(|ns| !ns.is_empty());

        Ok(Self {
            server: format!("https://{}:{}", host, port),
            token: Some(token.trim().to_string()),
            ca_cert,
            namespace,
        })
    }

    /// Check that `server` is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.server).map_err(|e| Error::ClusterConfig {
            message: format!("invalid API server URL '{}': {}", self.server, e),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::ClusterConfig {
                message: format!("unsupported API server scheme '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service_account_dir(with_ca: bool) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("token"), "secret-token\n").unwrap();
        fs::write(dir.path().join("namespace"), "team-a\n").unwrap();
        if with_ca {
            fs::write(dir.path().join("ca.crt"), "---").unwrap();
        }
        dir
    }

    #[test]
    fn test_from_service_account() {
        let dir = service_account_dir(true);
        let config = ClusterConfig::from_service_account(
            Some("10.0.0.1".to_string()),
            Some("443".to_string()),
            dir.path(),
        )
        .unwrap();
        assert_eq!(config.server, "https://10.0.0.1:443");
        assert_eq!(config.token.as_deref(), Some("secret-token"));
        assert_eq!(config.ca_cert, Some(dir.path().join("ca.crt")));
        assert_eq!(config.namespace.as_deref(), Some("team-a"));
        config.validate().unwrap();
    }

    #[test]
    fn test_from_service_account_ipv6_host() {
        let dir = service_account_dir(false);
        let config = ClusterConfig::from_service_account(
            Some("fd00::1".to_string()),
            Some("6443".to_string()),
            dir.path(),
        )
        .unwrap();
        assert_eq!(config.server, "https://[fd00::1]:6443");
        assert_eq!(config.ca_cert, None);
        config.validate().unwrap();
    }

    #[test]
    fn test_from_service_account_outside_cluster() {
        let dir = service_account_dir(false);
        let err = ClusterConfig::from_service_account(None, None, dir.path()).unwrap_err();
        assert!(matches!(err, Error::ClusterConfig { .. }));
    }

    #[test]
    fn test_from_service_account_missing_token() {
        let dir = TempDir::new().unwrap();
        let err = ClusterConfig::from_service_account(
            Some("10.0.0.1".to_string()),
            Some("443".to_string()),
            dir.path(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("service account token"));
    }

    #[test]
    fn test_builders() {
        let config = ClusterConfig::new("http://127.0.0.1:8001")
            .with_token("abc")
            .with_ca_cert("/tmp/ca.crt");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.ca_cert, Some(PathBuf::from("/tmp/ca.crt")));
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(ClusterConfig::new("not a url").validate().is_err());
        assert!(ClusterConfig::new("ftp://cluster").validate().is_err());
    }
}
