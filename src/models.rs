// src/models.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Free-form answers collected from the user, keyed by question id.
/// Opaque to the core: stored in the iteration record and echoed back verbatim.
pub type UserRequirements = serde_json::Map<String, Value>;

/// The four component categories a catalog can provide.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Agent,
    Command,
    Hook,
    Mcp,
}

impl ComponentCategory {
    /// All categories, in their canonical processing order.
    pub const ALL: [Self; 4] = [Self::Agent, Self::Command, Self::Hook, Self::Mcp];

    /// The plural key used for this category in the catalog and in selections.
    pub fn key(self) -> &'static str {
        match self {
            Self::Agent => "agents",
            Self::Command => "commands",
            Self::Hook => "hooks",
            Self::Mcp => "mcps",
        }
    }

    /// The subfolder name under the applied-config root for file-backed categories.
    pub fn dir_name(self) -> &'static str {
        self.key()
    }

    /// Whether this category's content is a connection spec that must be
    /// registered with an external tool instead of written to a file.
    pub fn is_remote(self) -> bool {
        matches!(self, Self::Mcp)
    }
}

/// A named, categorized unit of configuration content from the catalog.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Component {
    pub name: String,
    pub category: ComponentCategory,
    /// Opaque body: markdown for file-backed categories, a connection spec
    /// (JSON or legacy key:value text) for remote integrations.
    pub content: String,
    #[serde(default)]
    pub description: String,
}

/// The full component catalog, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ComponentsData {
    pub agents: HashMap<String, Component>,
    pub commands: HashMap<String, Component>,
    pub hooks: HashMap<String, Component>,
    pub mcps: HashMap<String, Component>,
    /// Opaque blobs carried along for collaborators; never interpreted here.
    pub settings: Value,
    pub templates: Value,
}

impl ComponentsData {
    /// Returns the name→component map for one category.
    pub fn category(&self, category: ComponentCategory) -> &HashMap<String, Component> {
        match category {
            ComponentCategory::Agent => &self.agents,
            ComponentCategory::Command => &self.commands,
            ComponentCategory::Hook => &self.hooks,
            ComponentCategory::Mcp => &self.mcps,
        }
    }

    /// Looks up a single component by category and name.
    pub fn lookup(&self, category: ComponentCategory, name: &str) -> Option<&Component> {
        self.category(category).get(name)
    }

    /// Whether a selected name exists in its category's catalog map.
    pub fn contains(&self, category: ComponentCategory, name: &str) -> bool {
        self.category(category).contains_key(name)
    }

    /// Total number of components across all four categories.
    pub fn len(&self) -> usize {
        ComponentCategory::ALL
            .iter()
            .map(|&c| self.category(c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An ordered selection of component names, one list per category.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedComponents {
    #[serde(default)]
    pub agents: Vec<String>,
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub hooks: Vec<String>,
    #[serde(default)]
    pub mcps: Vec<String>,
}

impl SelectedComponents {
    /// Returns the name list for one category.
    pub fn category(&self, category: ComponentCategory) -> &[String] {
        match category {
            ComponentCategory::Agent => &self.agents,
            ComponentCategory::Command => &self.commands,
            ComponentCategory::Hook => &self.hooks,
            ComponentCategory::Mcp => &self.mcps,
        }
    }

    /// Mutable access to the name list for one category.
    pub fn category_mut(&mut self, category: ComponentCategory) -> &mut Vec<String> {
        match category {
            ComponentCategory::Agent => &mut self.agents,
            ComponentCategory::Command => &mut self.commands,
            ComponentCategory::Hook => &mut self.hooks,
            ComponentCategory::Mcp => &mut self.mcps,
        }
    }

    /// Total number of selected names across all categories.
    pub fn len(&self) -> usize {
        ComponentCategory::ALL
            .iter()
            .map(|&c| self.category(c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One immutable record of a configuration run.
/// Persisted as `<project>/.configurator/iterations/<id>.json`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Iteration {
    /// ISO-8601 timestamp with `:` and `.` replaced by `-`.
    /// Filesystem-safe, and lexicographic order equals chronological order.
    pub id: String,
    /// The original ISO-8601 timestamp.
    pub timestamp: String,
    pub selected_components: SelectedComponents,
    pub user_requirements: UserRequirements,
}

/// The id/timestamp pair returned by history listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationSummary {
    pub id: String,
    pub timestamp: String,
}

/// The per-category set difference between two iterations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationDiff {
    pub added: SelectedComponents,
    pub removed: SelectedComponents,
    pub unchanged: SelectedComponents,
}

/// A backup snapshot of the applied-config folder, identified by the
/// timestamp embedded (reversibly) in its folder name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// ISO-8601 timestamp recovered from the folder name.
    pub timestamp: String,
    /// Absolute path to the snapshot folder.
    pub path: PathBuf,
}

/// The parsed connection spec of a remote-integration component.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteIntegrationSpec {
    /// Defaulted so that a missing field is reported as [`PayloadError::MissingCommand`]
    /// rather than a generic shape error.
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// Errors produced while interpreting a component's content body.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Integration spec has no 'command' field.")]
    MissingCommand,
    #[error("Integration spec JSON is not an object.")]
    NotAnObject,
    #[error("The 'mcpServers' wrapper object is empty.")]
    EmptyWrapper,
    #[error("Integration spec JSON has an invalid shape: {0}")]
    InvalidShape(#[from] serde_json::Error),
    #[error("Could not parse integration spec from text content.")]
    Unrecognized,
}

/// A component's content, interpreted per its category: plain text to write
/// to a file, or a connection spec to register with an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentPayload {
    Text(String),
    RemoteIntegration(RemoteIntegrationSpec),
}

impl ComponentPayload {
    /// Interprets a component's content according to its category.
    pub fn of(component: &Component) -> Result<Self, PayloadError> {
        if component.category.is_remote() {
            RemoteIntegrationSpec::parse(&component.content).map(Self::RemoteIntegration)
        } else {
            Ok(Self::Text(component.content.clone()))
        }
    }
}

impl RemoteIntegrationSpec {
    /// Parses a connection spec from a component body.
    ///
    /// Accepted shapes, tried in order:
    /// 1. A JSON object with `command`/`args`/`env` fields.
    /// 2. A JSON object wrapping one server definition under `mcpServers`.
    /// 3. A legacy `key: value` text block (`command:`, `args:`, `env:` lines).
    pub fn parse(content: &str) -> Result<Self, PayloadError> {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(mut map)) => {
                let spec_value = match map.remove("mcpServers") {
                    Some(Value::Object(servers)) => servers
                        .into_iter()
                        .next()
                        .map(|(_, v)| v)
                        .ok_or(PayloadError::EmptyWrapper)?,
                    Some(_) => return Err(PayloadError::NotAnObject),
                    None => Value::Object(map),
                };
                let spec: Self = serde_json::from_value(spec_value)?;
                if spec.command.is_empty() {
                    return Err(PayloadError::MissingCommand);
                }
                Ok(spec)
            }
            Ok(_) => Err(PayloadError::NotAnObject),
            Err(_) => Self::parse_legacy(content),
        }
    }

    /// Fallback parser for the legacy `key: value` line format.
    fn parse_legacy(content: &str) -> Result<Self, PayloadError> {
        let mut command = None;
        let mut args = Vec::new();
        let mut env = HashMap::new();
        let mut recognized_any = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "command" => {
                    command = Some(value.to_string());
                    recognized_any = true;
                }
                "args" => {
                    args = shlex::split(value).unwrap_or_default();
                    recognized_any = true;
                }
                "env" => {
                    for pair in value.split(',') {
                        if let Some((k, v)) = pair.split_once('=') {
                            env.insert(k.trim().to_string(), v.trim().to_string());
                        }
                    }
                    recognized_any = true;
                }
                _ => {}
            }
        }

        if !recognized_any {
            return Err(PayloadError::Unrecognized);
        }
        let command = command.filter(|c| !c.is_empty());
        Ok(Self {
            command: command.ok_or(PayloadError::MissingCommand)?,
            args,
            env,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcp_component(content: &str) -> Component {
        Component {
            name: "db".to_string(),
            category: ComponentCategory::Mcp,
            content: content.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn payload_of_file_backed_component_is_verbatim_text() {
        let component = Component {
            name: "reviewer".to_string(),
            category: ComponentCategory::Agent,
            content: "# Reviewer\nBe thorough.".to_string(),
            description: String::new(),
        };
        let payload = ComponentPayload::of(&component).unwrap();
        assert_eq!(
            payload,
            ComponentPayload::Text("# Reviewer\nBe thorough.".to_string())
        );
    }

    #[test]
    fn parses_plain_json_spec() {
        let spec = RemoteIntegrationSpec::parse(
            r#"{ "command": "npx", "args": ["-y", "server-db"], "env": {"TOKEN": "t"} }"#,
        )
        .unwrap();
        assert_eq!(spec.command, "npx");
        assert_eq!(spec.args, vec!["-y", "server-db"]);
        assert_eq!(spec.env.get("TOKEN").map(String::as_str), Some("t"));
    }

    #[test]
    fn parses_mcp_servers_wrapper() {
        let spec = RemoteIntegrationSpec::parse(
            r#"{ "mcpServers": { "db": { "command": "uvx", "args": ["server"] } } }"#,
        )
        .unwrap();
        assert_eq!(spec.command, "uvx");
        assert_eq!(spec.args, vec!["server"]);
    }

    #[test]
    fn parses_legacy_key_value_block() {
        let spec = RemoteIntegrationSpec::parse(
            "command: npx\nargs: -y server-db\nenv: TOKEN=t, REGION=eu\n",
        )
        .unwrap();
        assert_eq!(spec.command, "npx");
        assert_eq!(spec.args, vec!["-y", "server-db"]);
        assert_eq!(spec.env.len(), 2);
        assert_eq!(spec.env.get("REGION").map(String::as_str), Some("eu"));
    }

    #[test]
    fn rejects_spec_without_command() {
        assert!(matches!(
            RemoteIntegrationSpec::parse(r#"{ "args": ["x"] }"#),
            Err(PayloadError::MissingCommand)
        ));
        assert!(matches!(
            RemoteIntegrationSpec::parse(r#"{ "command": "" }"#),
            Err(PayloadError::MissingCommand)
        ));
        assert!(matches!(
            RemoteIntegrationSpec::parse("args: -y thing"),
            Err(PayloadError::MissingCommand)
        ));
    }

    #[test]
    fn rejects_unrecognized_text() {
        assert!(matches!(
            RemoteIntegrationSpec::parse("just some prose, nothing else"),
            Err(PayloadError::Unrecognized)
        ));
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(matches!(
            RemoteIntegrationSpec::parse(r#"["not", "an", "object"]"#),
            Err(PayloadError::NotAnObject)
        ));
    }

    #[test]
    fn payload_of_mcp_component_is_a_spec() {
        let payload = ComponentPayload::of(&mcp_component(r#"{ "command": "npx" }"#)).unwrap();
        assert!(matches!(payload, ComponentPayload::RemoteIntegration(_)));
    }
}
