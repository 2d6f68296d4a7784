// src/core/catalog.rs

use crate::models::{Component, ComponentCategory, ComponentsData};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading the component catalog. Callers can distinguish
/// a missing file from a malformed one from any other filesystem failure.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog file not found at '{path}'.")]
    NotFound { path: String },
    #[error("Catalog file at '{path}' is not valid JSON: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read catalog file at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The on-disk shape of one catalog entry. The component name is the map key,
/// so the entry itself only carries the body and description.
#[derive(Deserialize, Debug)]
struct RawComponent {
    content: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize, Debug, Default)]
struct RawCatalog {
    #[serde(default)]
    agents: HashMap<String, RawComponent>,
    #[serde(default)]
    commands: HashMap<String, RawComponent>,
    #[serde(default)]
    hooks: HashMap<String, RawComponent>,
    #[serde(default)]
    mcps: HashMap<String, RawComponent>,
    #[serde(default)]
    settings: Value,
    #[serde(default)]
    templates: Value,
}

/// Loads and parses the component catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<ComponentsData, CatalogError> {
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            CatalogError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            CatalogError::Io {
                path: path.display().to_string(),
                source: e,
            }
        }
    })?;

    let raw: RawCatalog =
        serde_json::from_str(&text).map_err(|e| CatalogError::InvalidJson {
            path: path.display().to_string(),
            source: e,
        })?;

    Ok(ComponentsData {
        agents: into_components(raw.agents, ComponentCategory::Agent),
        commands: into_components(raw.commands, ComponentCategory::Command),
        hooks: into_components(raw.hooks, ComponentCategory::Hook),
        mcps: into_components(raw.mcps, ComponentCategory::Mcp),
        settings: raw.settings,
        templates: raw.templates,
    })
}

fn into_components(
    raw: HashMap<String, RawComponent>,
    category: ComponentCategory,
) -> HashMap<String, Component> {
    raw.into_iter()
        .map(|(name, entry)| {
            let component = Component {
                name: name.clone(),
                category,
                content: entry.content,
                description: entry.description,
            };
            (name, component)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r##"{
        "agents": {
            "reviewer": { "content": "# Reviewer", "description": "Reviews code" }
        },
        "commands": {},
        "hooks": {
            "fmt": { "content": "cargo fmt" }
        },
        "mcps": {
            "db": { "content": "{\"command\": \"npx\"}", "description": "Database" }
        },
        "settings": { "theme": "dark" }
    }"##;

    #[test]
    fn loads_a_well_formed_catalog() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains(ComponentCategory::Agent, "reviewer"));
        assert!(catalog.contains(ComponentCategory::Mcp, "db"));
        assert!(!catalog.contains(ComponentCategory::Command, "reviewer"));

        let hook = catalog.lookup(ComponentCategory::Hook, "fmt").unwrap();
        assert_eq!(hook.content, "cargo fmt");
        assert_eq!(hook.description, "");
        assert_eq!(catalog.settings["theme"], "dark");
    }

    #[test]
    fn missing_file_is_a_not_found_error() {
        let result = load_catalog(Path::new("no_such_catalog_file.json"));
        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
    }

    #[test]
    fn malformed_json_is_an_invalid_json_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        file.flush().unwrap();

        let result = load_catalog(file.path());
        assert!(matches!(result, Err(CatalogError::InvalidJson { .. })));
    }
}
