//! # Devfile Template Schema and Parsing
//!
//! This module defines the data structures that represent a devfile template
//! (the `spec` of a `DevWorkspaceTemplate`), together with the logic for
//! decoding it from YAML or JSON.
//!
//! ## Key Components
//!
//! - **`TemplateDocument`**: An optional parent reference plus the three ordered
//!   entry lists: commands, components and projects.
//!
//! - **`ParentReference`**: Where the parent lives, either a remote URI or a
//!   cluster-stored `DevWorkspaceTemplate`.
//!
//! - **Entry enums** (`Command`, `Component`, `ProjectSource`): the wire format
//!   is a mapping with exactly one populated key (`exec:`, `container:`, ...).
//!   Each enum decodes through a private field struct and rejects documents
//!   that populate zero or several keys.
//!
//! ## Strictness
//!
//! Every struct is decoded with `deny_unknown_fields`. A misspelled key is an
//! error, never silently dropped.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// API group of the `DevWorkspaceTemplate` custom resource.
pub const API_GROUP: &str = "workspaces.ecd.eclipse.org";
/// API version of the `DevWorkspaceTemplate` custom resource.
pub const API_VERSION: &str = "v1alpha1";
/// Kind of the cluster-stored template resource.
pub const TEMPLATE_KIND: &str = "DevWorkspaceTemplate";
/// Plural resource name used in API paths.
pub const TEMPLATE_PLURAL: &str = "devworkspacetemplates";

/// A devfile template: a parent reference plus commands, components and projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TemplateDocument {
    /// The template this one inherits from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
}

////// PARENT REFERENCES //////

/// Location of a parent template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ParentFields", into = "ParentFields")]
pub enum ParentReference {
    /// A devfile served over HTTP(S).
    Uri(String),
    /// A `DevWorkspaceTemplate` stored in the cluster.
    Kubernetes(ClusterLocation),
}

/// Name and namespace of a cluster-stored template.
///
/// An empty namespace means "the namespace of the workspace being flattened".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClusterLocation {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl ClusterLocation {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// The namespace to look the template up in.
    pub fn effective_namespace<'a>(&'a self, default_namespace: &'a str) -> &'a str {
        if self.namespace.is_empty() {
            default_namespace
        } else {
            &self.namespace
        }
    }
}

impl fmt::Display for ParentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentReference::Uri(uri) => write!(f, "{}", uri),
            ParentReference::Kubernetes(location) if location.namespace.is_empty() => {
                write!(f, "{}/{}", TEMPLATE_KIND, location.name)
            }
            ParentReference::Kubernetes(location) => {
                write!(f, "{}/{}/{}", TEMPLATE_KIND, location.namespace, location.name)
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ParentFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kubernetes: Option<ClusterLocation>,
}

impl TryFrom<ParentFields> for ParentReference {
    type Error = String;

    fn try_from(fields: ParentFields) -> std::result::Result<Self, Self::Error> {
        let mut variants = Vec::new();
        if let Some(uri) = fields.uri.filter(|uri| !uri.is_empty()) {
            variants.push(ParentReference::Uri(uri));
        }
        if let Some(location) = fields.kubernetes {
            if location.name.is_empty() {
                return Err("parent.kubernetes.name must not be empty".to_string());
            }
            variants.push(ParentReference::Kubernetes(location));
        }
        exactly_one("parent", &["uri", "kubernetes"], variants)
    }
}

impl From<ParentReference> for ParentFields {
    fn from(parent: ParentReference) -> Self {
        match parent {
            ParentReference::Uri(uri) => ParentFields {
                uri: Some(uri),
                kubernetes: None,
            },
            ParentReference::Kubernetes(location) => ParentFields {
                uri: None,
                kubernetes: Some(location),
            },
        }
    }
}

/// Pick the single populated variant of a one-of mapping.
fn exactly_one<T>(what: &str, keys: &[&str], mut variants: Vec<T>) -> std::result::Result<T, String> {
    if variants.len() > 1 {
        return Err(format!("{} must set only one of: {}", what, keys.join(", ")));
    }
    variants
        .pop()
        .ok_or_else(|| format!("{} must set one of: {}", what, keys.join(", ")))
}

////// COMMANDS //////

/// A workspace command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CommandFields", into = "CommandFields")]
pub enum Command {
    Exec(ExecCommand),
    VscodeLaunch(VscodeConfigCommand),
    VscodeTask(VscodeConfigCommand),
    Composite(CompositeCommand),
    Custom(CustomCommand),
}

impl Command {
    /// Wire name of this command's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Exec(_) => "exec",
            Command::VscodeLaunch(_) => "vscodeLaunch",
            Command::VscodeTask(_) => "vscodeTask",
            Command::Composite(_) => "composite",
            Command::Custom(_) => "custom",
        }
    }

    /// The command alias, empty when unset.
    pub fn alias(&self) -> &str {
        match self {
            Command::Exec(c) => &c.alias,
            Command::VscodeLaunch(c) | Command::VscodeTask(c) => &c.alias,
            Command::Composite(c) => &c.alias,
            Command::Custom(c) => &c.alias,
        }
    }
}

/// Run a command line inside a container component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExecCommand {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    /// Human readable name; preferred over the alias when displayed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command_line: String,
    /// Alias of the component the command runs in.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub component: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub workdir: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<CommandGroup>,
}

/// A VS Code `launch.json` or `tasks.json` configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VscodeConfigCommand {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub inlined: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<CommandGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompositeCommand {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Aliases of the commands to run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub parallel: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomCommand {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    pub command_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommandGroup {
    pub kind: CommandGroupKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandGroupKind {
    Build,
    Run,
    Test,
    Debug,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvVar {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CommandFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exec: Option<ExecCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vscode_launch: Option<VscodeConfigCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vscode_task: Option<VscodeConfigCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    composite: Option<CompositeCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom: Option<CustomCommand>,
}

impl TryFrom<CommandFields> for Command {
    type Error = String;

    fn try_from(fields: CommandFields) -> std::result::Result<Self, Self::Error> {
        let mut variants = Vec::new();
        variants.extend(fields.exec.map(Command::Exec));
        variants.extend(fields.vscode_launch.map(Command::VscodeLaunch));
        variants.extend(fields.vscode_task.map(Command::VscodeTask));
        variants.extend(fields.composite.map(Command::Composite));
        variants.extend(fields.custom.map(Command::Custom));
        exactly_one(
            "command",
            &["exec", "vscodeLaunch", "vscodeTask", "composite", "custom"],
            variants,
        )
    }
}

impl From<Command> for CommandFields {
    fn from(command: Command) -> Self {
        let mut fields = CommandFields {
            exec: None,
            vscode_launch: None,
            vscode_task: None,
            composite: None,
            custom: None,
        };
        match command {
            Command::Exec(c) => fields.exec = Some(c),
            Command::VscodeLaunch(c) => fields.vscode_launch = Some(c),
            Command::VscodeTask(c) => fields.vscode_task = Some(c),
            Command::Composite(c) => fields.composite = Some(c),
            Command::Custom(c) => fields.custom = Some(c),
        }
        fields
    }
}

////// COMPONENTS //////

/// A workspace component: editor, plugin, container, volume or cluster manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ComponentFields", into = "ComponentFields")]
pub enum Component {
    CheEditor(CheEditorComponent),
    ChePlugin(ChePluginComponent),
    Container(ContainerComponent),
    Volume(VolumeComponent),
    Kubernetes(KubernetesComponent),
    Openshift(KubernetesComponent),
}

impl Component {
    /// Wire name of this component's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Component::CheEditor(_) => "cheEditor",
            Component::ChePlugin(_) => "chePlugin",
            Component::Container(_) => "container",
            Component::Volume(_) => "volume",
            Component::Kubernetes(_) => "kubernetes",
            Component::Openshift(_) => "openshift",
        }
    }

    /// A human readable handle for log messages.
    pub fn display_name(&self) -> &str {
        match self {
            Component::CheEditor(c) => c.alias.as_str(),
            Component::ChePlugin(c) => c.alias.as_str(),
            Component::Container(c) if !c.alias.is_empty() => c.alias.as_str(),
            Component::Container(c) => c.name.as_str(),
            Component::Volume(c) => c.name.as_str(),
            Component::Kubernetes(c) | Component::Openshift(c) => c.name.as_str(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistryEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub registry_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheEditorComponent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_entry: Option<RegistryEntry>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memory_limit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChePluginComponent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_entry: Option<RegistryEntry>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memory_limit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContainerComponent {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memory_limit: String,
    /// Whether project sources are mounted into the container.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mount_sources: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<Endpoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Endpoint {
    pub name: String,
    pub target_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<EndpointConfiguration>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EndpointConfiguration {
    /// URL scheme exposed to clients, e.g. `http` or `wss`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scheme: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub public: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VolumeComponent {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub size: String,
}

/// Cluster manifests, either referenced by URI or inlined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KubernetesComponent {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub inlined: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ComponentFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    che_editor: Option<CheEditorComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    che_plugin: Option<ChePluginComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    container: Option<ContainerComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    volume: Option<VolumeComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kubernetes: Option<KubernetesComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    openshift: Option<KubernetesComponent>,
}

impl TryFrom<ComponentFields> for Component {
    type Error = String;

    fn try_from(fields: ComponentFields) -> std::result::Result<Self, Self::Error> {
        let mut variants = Vec::new();
        variants.extend(fields.che_editor.map(Component::CheEditor));
        variants.extend(fields.che_plugin.map(Component::ChePlugin));
        variants.extend(fields.container.map(Component::Container));
        variants.extend(fields.volume.map(Component::Volume));
        variants.extend(fields.kubernetes.map(Component::Kubernetes));
        variants.extend(fields.openshift.map(Component::Openshift));
        exactly_one(
            "component",
            &[
                "cheEditor",
                "chePlugin",
                "container",
                "volume",
                "kubernetes",
                "openshift",
            ],
            variants,
        )
    }
}

impl From<Component> for ComponentFields {
    fn from(component: Component) -> Self {
        let mut fields = ComponentFields {
            che_editor: None,
            che_plugin: None,
            container: None,
            volume: None,
            kubernetes: None,
            openshift: None,
        };
        match component {
            Component::CheEditor(c) => fields.che_editor = Some(c),
            Component::ChePlugin(c) => fields.che_plugin = Some(c),
            Component::Container(c) => fields.container = Some(c),
            Component::Volume(c) => fields.volume = Some(c),
            Component::Kubernetes(c) => fields.kubernetes = Some(c),
            Component::Openshift(c) => fields.openshift = Some(c),
        }
        fields
    }
}

////// PROJECTS //////

/// A project cloned into the workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProjectFields", into = "ProjectFields")]
pub struct Project {
    pub name: String,
    /// Path relative to the projects root; defaults to the project name.
    pub clone_path: String,
    pub source: Option<ProjectSource>,
}

impl Project {
    pub fn new(name: impl Into<String>, source: ProjectSource) -> Self {
        Self {
            name: name.into(),
            clone_path: String::new(),
            source: Some(source),
        }
    }
}

/// Where project sources come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSource {
    Git(GitSource),
    Github(GitSource),
    Zip(ZipSource),
    Custom(CustomSource),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GitSource {
    pub location: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ZipSource {
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomSource {
    pub project_source_class: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ProjectFields {
    name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    clone_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    git: Option<GitSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    github: Option<GitSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zip: Option<ZipSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom: Option<CustomSource>,
}

impl TryFrom<ProjectFields> for Project {
    type Error = String;

    fn try_from(fields: ProjectFields) -> std::result::Result<Self, Self::Error> {
        let mut sources = Vec::new();
        sources.extend(fields.git.map(ProjectSource::Git));
        sources.extend(fields.github.map(ProjectSource::Github));
        sources.extend(fields.zip.map(ProjectSource::Zip));
        sources.extend(fields.custom.map(ProjectSource::Custom));
        if sources.len() > 1 {
            return Err(format!(
                "project '{}' must set only one of: git, github, zip, custom",
                fields.name
            ));
        }
        Ok(Project {
            name: fields.name,
            clone_path: fields.clone_path,
            source: sources.pop(),
        })
    }
}

impl From<Project> for ProjectFields {
    fn from(project: Project) -> Self {
        let mut fields = ProjectFields {
            name: project.name,
            clone_path: project.clone_path,
            git: None,
            github: None,
            zip: None,
            custom: None,
        };
        match project.source {
            Some(ProjectSource::Git(s)) => fields.git = Some(s),
            Some(ProjectSource::Github(s)) => fields.github = Some(s),
            Some(ProjectSource::Zip(s)) => fields.zip = Some(s),
            Some(ProjectSource::Custom(s)) => fields.custom = Some(s),
            None => {}
        }
        fields
    }
}

////// DOCUMENT WRAPPERS //////

/// A devfile served from a URI: the template plus devfile header keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RemoteDevfile {
    #[serde(default)]
    #[allow(dead_code)]
    name: String,
    #[serde(default)]
    #[allow(dead_code)]
    schema_version: String,
    #[serde(default)]
    parent: Option<ParentReference>,
    #[serde(default)]
    commands: Vec<Command>,
    #[serde(default)]
    components: Vec<Component>,
    #[serde(default)]
    projects: Vec<Project>,
}

impl From<RemoteDevfile> for TemplateDocument {
    fn from(devfile: RemoteDevfile) -> Self {
        TemplateDocument {
            parent: devfile.parent,
            commands: devfile.commands,
            components: devfile.components,
            projects: devfile.projects,
        }
    }
}

/// The subset of Kubernetes object metadata this crate reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

/// A `DevWorkspaceTemplate` custom resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevWorkspaceTemplate {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: TemplateDocument,
}

/// A template read from a local file, plus the namespace its resource
/// metadata declared (if it was a full resource).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTemplate {
    pub template: TemplateDocument,
    pub namespace: Option<String>,
}

/// Return the first YAML document in `content` that is not empty.
fn first_document(content: &str, origin: &str) -> Result<Option<serde_yaml::Value>> {
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = serde_yaml::Value::deserialize(document).map_err(|e| Error::schema(origin, e))?;
        if !value.is_null() {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// Parse the body of a remote parent devfile.
///
/// Only the first non-empty YAML document is considered; anything after it
/// is ignored. An empty body yields an empty template.
pub fn parse_remote(content: &str, origin: &str) -> Result<TemplateDocument> {
    match first_document(content, origin)? {
        Some(value) => serde_yaml::from_value::<RemoteDevfile>(value)
            .map(TemplateDocument::from)
            .map_err(|e| Error::schema(origin, e)),
        None => Ok(TemplateDocument::default()),
    }
}

/// Parse a `DevWorkspaceTemplate` resource as returned by the cluster API.
pub fn parse_resource_json(content: &str, origin: &str) -> Result<DevWorkspaceTemplate> {
    serde_json::from_str(content).map_err(|e| Error::schema(origin, e))
}

/// Parse a template file written either as a bare template or as a full
/// `DevWorkspaceTemplate` resource.
pub fn parse_template(content: &str, origin: &str) -> Result<ParsedTemplate> {
    let Some(value) = first_document(content, origin)? else {
        return Ok(ParsedTemplate {
            template: TemplateDocument::default(),
            namespace: None,
        });
    };

    let is_resource = value
        .as_mapping()
        .is_some_and(|map| map.contains_key("spec") && map.contains_key("kind"));

    if is_resource {
        let resource: DevWorkspaceTemplate =
            serde_yaml::from_value(value).map_err(|e| Error::schema(origin, e))?;
        if resource.kind != TEMPLATE_KIND {
            return Err(Error::Schema {
                origin: origin.to_string(),
                message: format!("expected kind {}, found {}", TEMPLATE_KIND, resource.kind),
            });
        }
        let namespace = Some(resource.metadata.namespace).filter(|ns| !ns.is_empty());
        Ok(ParsedTemplate {
            template: resource.spec,
            namespace,
        })
    } else {
        let template = serde_yaml::from_value(value).map_err(|e| Error::schema(origin, e))?;
        Ok(ParsedTemplate {
            template,
            namespace: None,
        })
    }
}

/// Read and parse a template file from disk.
pub fn from_file(path: &std::path::Path) -> Result<ParsedTemplate> {
    let content = std::fs::read_to_string(path)?;
    parse_template(&content, &path.display().to_string())
}
