//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then `use common::prelude::*;`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;

use devfile_flatten::error::{Error, Result};
use devfile_flatten::resolver::{ClusterOperations, RemoteOperations, TemplateResolver};
use devfile_flatten::schema::TemplateDocument;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::templates;
    pub use super::{DocumentServer, TestFixture};
}

/// Template YAML snippets shared across tests.
pub mod templates {
    /// A template without a parent.
    pub const STANDALONE: &str = r#"
projects:
  - name: app
    git:
      location: https://github.com/example/app.git
components:
  - container:
      name: tools
      alias: tools
      image: quay.io/example/tools:latest
      mountSources: true
      endpoints:
        - name: web
          targetPort: 8080
          configuration:
            scheme: http
  - volume:
      name: m2
      size: 1Gi
commands:
  - exec:
      alias: build
      component: tools
      commandLine: mvn package
      workdir: /projects/app
  - composite:
      alias: all
      commands: [build]
"#;

    /// A full `DevWorkspaceTemplate` resource.
    pub const RESOURCE: &str = r#"
apiVersion: workspaces.ecd.eclipse.org/v1alpha1
kind: DevWorkspaceTemplate
metadata:
  name: web-stack
  namespace: team-a
spec:
  projects:
    - name: web
      zip:
        location: https://example.com/web.zip
"#;

    /// A template with a field the schema does not know.
    pub const UNKNOWN_FIELD: &str = r#"
projects:
  - name: app
    git:
      location: https://github.com/example/app.git
    sparse: true
"#;

    /// A component that sets two kinds at once.
    pub const TWO_KINDS: &str = r#"
components:
  - volume:
      name: m2
    container:
      name: tools
      image: busybox
"#;

    /// A parent devfile as served from a URI.
    pub const REMOTE_PARENT: &str = r#"
schemaVersion: 2.0.0
name: java-base
projects:
  - name: app
    git:
      location: https://github.com/example/upstream.git
  - name: docs
    zip:
      location: https://example.com/docs.zip
commands:
  - exec:
      alias: build
      commandLine: ./gradlew build
"#;
}

/// A temporary directory holding template files.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `devfile.yaml` with the given content.
    pub fn with_template(self, content: &str) -> Self {
        self.with_file("devfile.yaml", content)
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn template_path(&self) -> PathBuf {
        self.temp_dir.path().join("devfile.yaml")
    }

    /// A command for the binary that ignores any cluster settings of the
    /// environment running the tests.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("devfile-flatten");
        cmd.current_dir(self.path())
            .env_remove("KUBERNETES_SERVICE_HOST")
            .env_remove("KUBERNETES_SERVICE_PORT")
            .env_remove("DEVFILE_FLATTEN_SERVER")
            .env_remove("DEVFILE_FLATTEN_TOKEN")
            .env_remove("DEVFILE_FLATTEN_CA_CERT")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A local HTTP server answering GET requests from a fixed route table.
///
/// Unknown paths get a 404. The server thread lives until the test process
/// exits.
pub struct DocumentServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl DocumentServer {
    /// Serve `routes`, a list of `(path, status line, body)`. Occurrences of
    /// `{base}` in a body are replaced with the server's base URL.
    pub fn start(routes: &[(&str, &str, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: HashMap<String, (String, String)> = routes
            .iter()
            .map(|(path, status, body)| {
                (
                    path.to_string(),
                    (status.to_string(), body.replace("{base}", &base_url)),
                )
            })
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
                    continue;
                }
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                        break;
                    }
                }
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();
                seen.lock().unwrap().push(path.clone());

                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or_else(|| ("404 Not Found".to_string(), "not found".to_string()));
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Self { base_url, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Paths requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Shared log of resolver calls, as `uri:<uri>` or `cluster:<ns>/<name>`.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, call: String) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub struct MockRemote {
    pub documents: HashMap<String, String>,
    pub log: CallLog,
}

impl RemoteOperations for MockRemote {
    fn fetch(&self, uri: &str) -> Result<String> {
        self.log.record(format!("uri:{}", uri));
        self.documents.get(uri).cloned().ok_or_else(|| Error::Fetch {
            uri: uri.to_string(),
            message: "404 Not Found".to_string(),
        })
    }
}

pub struct MockCluster {
    pub templates: HashMap<String, TemplateDocument>,
    pub log: CallLog,
}

impl ClusterOperations for MockCluster {
    fn get_template(&self, name: &str, namespace: &str) -> Result<TemplateDocument> {
        let key = format!("{}/{}", namespace, name);
        self.log.record(format!("cluster:{}", key));
        self.templates.get(&key).cloned().ok_or_else(|| Error::NotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
        })
    }
}

/// A resolver over in-memory documents (keyed by URI) and cluster templates
/// (keyed by `namespace/name`).
pub fn mock_resolver(
    documents: &[(&str, &str)],
    templates: Vec<(&str, TemplateDocument)>,
) -> (TemplateResolver, CallLog) {
    let log = CallLog::default();
    let remote = MockRemote {
        documents: documents
            .iter()
            .map(|(uri, body)| (uri.to_string(), body.to_string()))
            .collect(),
        log: log.clone(),
    };
    let cluster = MockCluster {
        templates: templates
            .into_iter()
            .map(|(key, template)| (key.to_string(), template))
            .collect(),
        log: log.clone(),
    };
    (
        TemplateResolver::with_operations(Box::new(remote), Box::new(cluster)),
        log,
    )
}
