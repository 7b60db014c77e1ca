//! Translation into the legacy devfile schema
//!
//! Older clients consume a devfile shape that predates template inheritance.
//! Translation is a best-effort projection of a flattened template:
//!
//! - `exec`, `vscodeLaunch` and `vscodeTask` commands become legacy commands
//!   with a single action.
//! - `cheEditor`, `chePlugin` and `container` components become `cheEditor`,
//!   `chePlugin` and `dockerimage` components.
//! - Projects keep their name and source location; the source type becomes
//!   `git`, `github` or `zip`.
//!
//! Anything else has no legacy counterpart and is dropped. `translate` logs
//! each dropped entry; `translate_with_report` also returns them.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::schema::{
    Command, Component, ContainerComponent, Endpoint, Project, ProjectSource, RegistryEntry,
    TemplateDocument,
};

/// Endpoint attribute holding the URL scheme clients should use.
pub const PROTOCOL_ENDPOINT_ATTRIBUTE: &str = "protocol";

/// A devfile in the legacy schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<LegacyProject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<LegacyComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<LegacyCommand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCommand {
    pub name: String,
    pub actions: Vec<LegacyAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegacyActionType {
    #[serde(rename = "exec")]
    Exec,
    #[serde(rename = "vscode-launch")]
    VscodeLaunch,
    #[serde(rename = "vscode-task")]
    VscodeTask,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAction {
    #[serde(rename = "type")]
    pub action_type: LegacyActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegacyComponentType {
    #[serde(rename = "cheEditor")]
    Editor,
    #[serde(rename = "chePlugin")]
    Plugin,
    #[serde(rename = "dockerimage")]
    DockerImage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyComponent {
    #[serde(rename = "type")]
    pub component_type: LegacyComponentType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_sources: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<LegacyEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyEndpoint {
    pub name: String,
    pub port: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProject {
    pub name: String,
    pub source: LegacyProjectSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProjectSource {
    /// `git`, `github` or `zip`; empty when the source has no legacy form.
    #[serde(rename = "type")]
    pub source_type: String,
    pub location: String,
}

/// An entry that had no legacy counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEntry {
    /// `command` or `component`.
    pub list: &'static str,
    /// The entry's kind in the current schema, e.g. `composite`.
    pub kind: &'static str,
    /// Alias or name, empty when the entry has none.
    pub name: String,
}

impl fmt::Display for DroppedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} of kind {}", self.list, self.kind)
        } else {
            write!(f, "{} '{}' of kind {}", self.list, self.name, self.kind)
        }
    }
}

/// Result of `translate_with_report`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    pub document: LegacyDocument,
    pub dropped: Vec<DroppedEntry>,
}

/// Translate a flattened template into the legacy schema.
///
/// Never fails. Entries without a legacy form are dropped and logged.
pub fn translate(template: &TemplateDocument) -> LegacyDocument {
    let translation = translate_with_report(template);
    for entry in &translation.dropped {
        warn!("Dropping {} during legacy translation", entry);
    }
    translation.document
}

/// Translate a flattened template and report what was dropped.
pub fn translate_with_report(template: &TemplateDocument) -> Translation {
    let mut translation = Translation::default();

    for command in &template.commands {
        match to_legacy_command(command) {
            Some(legacy) => translation.document.commands.push(legacy),
            None => translation.dropped.push(DroppedEntry {
                list: "command",
                kind: command.kind(),
                name: command.alias().to_string(),
            }),
        }
    }

    for component in &template.components {
        match to_legacy_component(component) {
            Some(legacy) => translation.document.components.push(legacy),
            None => translation.dropped.push(DroppedEntry {
                list: "component",
                kind: component.kind(),
                name: component.display_name().to_string(),
            }),
        }
    }

    translation.document.projects = template.projects.iter().map(to_legacy_project).collect();

    translation
}

fn none_if_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn to_legacy_command(command: &Command) -> Option<LegacyCommand> {
    match command {
        Command::Exec(exec) => {
            let name = if exec.label.is_empty() {
                exec.alias.clone()
            } else {
                exec.label.clone()
            };
            Some(LegacyCommand {
                name,
                actions: vec![LegacyAction {
                    action_type: LegacyActionType::Exec,
                    command: none_if_empty(&exec.command_line),
                    component: none_if_empty(&exec.component),
                    workdir: none_if_empty(&exec.workdir),
                    reference_content: None,
                }],
            })
        }
        Command::VscodeLaunch(launch) => Some(vscode_command(
            &launch.alias,
            &launch.inlined,
            LegacyActionType::VscodeLaunch,
        )),
        Command::VscodeTask(task) => Some(vscode_command(
            &task.alias,
            &task.inlined,
            LegacyActionType::VscodeTask,
        )),
        Command::Composite(_) | Command::Custom(_) => None,
    }
}

fn vscode_command(alias: &str, inlined: &str, action_type: LegacyActionType) -> LegacyCommand {
    LegacyCommand {
        name: alias.to_string(),
        actions: vec![LegacyAction {
            action_type,
            command: None,
            component: None,
            workdir: None,
            reference_content: none_if_empty(inlined),
        }],
    }
}

fn registry_id(entry: &Option<RegistryEntry>) -> Option<String> {
    entry.as_ref().and_then(|entry| none_if_empty(&entry.id))
}

fn to_legacy_component(component: &Component) -> Option<LegacyComponent> {
    match component {
        Component::CheEditor(editor) => Some(LegacyComponent {
            component_type: LegacyComponentType::Editor,
            alias: editor.alias.clone(),
            id: registry_id(&editor.registry_entry),
            image: None,
            memory_limit: none_if_empty(&editor.memory_limit),
            mount_sources: None,
            endpoints: Vec::new(),
        }),
        Component::ChePlugin(plugin) => Some(LegacyComponent {
            component_type: LegacyComponentType::Plugin,
            alias: plugin.alias.clone(),
            id: registry_id(&plugin.registry_entry),
            image: None,
            memory_limit: none_if_empty(&plugin.memory_limit),
            mount_sources: None,
            endpoints: Vec::new(),
        }),
        Component::Container(container) => Some(to_legacy_container(container)),
        Component::Volume(_) | Component::Kubernetes(_) | Component::Openshift(_) => None,
    }
}

fn to_legacy_container(container: &ContainerComponent) -> LegacyComponent {
    LegacyComponent {
        component_type: LegacyComponentType::DockerImage,
        alias: container.alias.clone(),
        id: None,
        image: none_if_empty(&container.image),
        memory_limit: none_if_empty(&container.memory_limit),
        mount_sources: Some(container.mount_sources),
        endpoints: container.endpoints.iter().map(to_legacy_endpoint).collect(),
    }
}

fn to_legacy_endpoint(endpoint: &Endpoint) -> LegacyEndpoint {
    let mut attributes = BTreeMap::new();
    if let Some(scheme) = endpoint
        .configuration
        .as_ref()
        .map(|configuration| configuration.scheme.as_str())
        .filter(|scheme| !scheme.is_empty())
    {
        attributes.insert(PROTOCOL_ENDPOINT_ATTRIBUTE.to_string(), scheme.to_string());
    }
    LegacyEndpoint {
        name: endpoint.name.clone(),
        port: i64::from(endpoint.target_port),
        attributes,
    }
}

fn to_legacy_project(project: &Project) -> LegacyProject {
    let source = match &project.source {
        Some(ProjectSource::Zip(zip)) => LegacyProjectSource {
            source_type: "zip".to_string(),
            location: zip.location.clone(),
        },
        Some(ProjectSource::Git(git)) => LegacyProjectSource {
            source_type: "git".to_string(),
            location: git.location.clone(),
        },
        Some(ProjectSource::Github(github)) => LegacyProjectSource {
            source_type: "github".to_string(),
            location: github.location.clone(),
        },
        Some(ProjectSource::Custom(_)) | None => LegacyProjectSource::default(),
    };
    LegacyProject {
        name: project.name.clone(),
        source,
    }
}
