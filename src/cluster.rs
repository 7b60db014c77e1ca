//! Lookup of `DevWorkspaceTemplate` resources through the Kubernetes API
//!
//! Requests go straight to the API server's REST endpoint:
//!
//! ```text
//! GET {server}/apis/workspaces.ecd.eclipse.org/v1alpha1/namespaces/{ns}/devworkspacetemplates/{name}
//! ```
//!
//! A 404 maps to `Error::NotFound`; every other failure maps to
//! `Error::ClusterAccess`.

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::config::ClusterConfig;
use crate::error::{Error, Result};
use crate::schema::{
    self, TemplateDocument, API_GROUP, API_VERSION, TEMPLATE_KIND, TEMPLATE_PLURAL,
};

/// A blocking client for reading templates from one API server.
#[derive(Debug)]
pub struct KubeApiClient {
    config: ClusterConfig,
    agent: ureq::Agent,
}

impl KubeApiClient {
    /// Create a client, loading the CA bundle when one is configured.
    pub fn new(config: ClusterConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = ureq::AgentBuilder::new();
        if let Some(ca_path) = &config.ca_cert {
            builder = builder.tls_config(Arc::new(tls_config_with_ca(ca_path)?));
        }
        Ok(Self {
            config,
            agent: builder.build(),
        })
    }

    /// REST path of a template resource.
    ///
    /// Each path segment is percent-encoded, so a name cannot address a
    /// different endpoint.
    pub fn template_url(&self, name: &str, namespace: &str) -> Result<String> {
        let invalid = |message: String| Error::ClusterConfig { message };
        let mut url = url::Url::parse(&self.config.server).map_err(|e| {
            invalid(format!("invalid API server URL '{}': {}", self.config.server, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("API server URL '{}' has no path", self.config.server)))?
            .pop_if_empty()
            .extend([
                "apis",
                API_GROUP,
                API_VERSION,
                "namespaces",
                namespace,
                TEMPLATE_PLURAL,
                name,
            ]);
        Ok(url.into())
    }

    /// Read the template `name` in `namespace` and return its spec.
    pub fn get_template(&self, name: &str, namespace: &str) -> Result<TemplateDocument> {
        let access_error = |message: String| Error::ClusterAccess {
            name: name.to_string(),
            namespace: namespace.to_string(),
            message,
        };

        // No template can carry these names; the path would name the collection
        if [name, namespace].iter().any(|part| matches!(*part, "" | "." | "..")) {
            return Err(Error::NotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            });
        }

        let url = self.template_url(name, namespace)?;
        info!("Reading DevWorkspaceTemplate {}/{}", namespace, name);
        debug!("GET {}", url);

        let mut request = self.agent.get(&url).set("Accept", "application/json");
        if let Some(token) = &self.config.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => {
                return Err(Error::NotFound {
                    name: name.to_string(),
                    namespace: namespace.to_string(),
                });
            }
            Err(ureq::Error::Status(code, response)) => {
                let status_text = response.status_text().to_string();
                let detail = response.into_string().unwrap_or_default();
                return Err(access_error(format!(
                    "{} {}: {}",
                    code,
                    status_text,
                    detail.trim()
                )));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(access_error(transport.to_string()));
            }
        };

        let body = response
            .into_string()
            .map_err(|e| access_error(format!("failed to read response body: {}", e)))?;
        let resource = schema::parse_resource_json(&body, &url)?;
        if resource.kind != TEMPLATE_KIND {
            return Err(Error::Schema {
                origin: url,
                message: format!("expected kind {}, found {}", TEMPLATE_KIND, resource.kind),
            });
        }
        Ok(resource.spec)
    }
}

/// TLS settings trusting only the certificates in the PEM bundle at `path`.
fn tls_config_with_ca(path: &Path) -> Result<rustls::ClientConfig> {
    let config_error = |message: String| Error::ClusterConfig { message };

    let pem = std::fs::read(path)
        .map_err(|e| config_error(format!("cannot read CA bundle {}: {}", path.display(), e)))?;

    let mut roots = rustls::RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut pem.as_slice()) {
        let cert = cert
            .map_err(|e| config_error(format!("invalid CA bundle {}: {}", path.display(), e)))?;
        roots
            .add(cert)
            .map_err(|e| config_error(format!("invalid CA certificate in {}: {}", path.display(), e)))?;
    }
    if roots.is_empty() {
        return Err(config_error(format!(
            "CA bundle {} contains no certificates",
            path.display()
        )));
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| config_error(format!("TLS setup failed: {}", e)))?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(config)
}
