// src/core/recommender.rs
//
// Asks the configured AI CLI to pick components from the catalog for the
// collected requirements. The response contract is loose by nature: the
// model replies with prose around a JSON object, so the object is extracted
// by brace matching and anything not present in the catalog is dropped
// before the selection reaches the manager or the tracker.

use crate::core::settings::Settings;
use crate::models::{ComponentCategory, ComponentsData, SelectedComponents, UserRequirements};
use crate::system::executor::{self, ExecutionError};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error(
        "The AI tool '{0}' was not found on PATH. Install it or set `ai_command` in settings.toml."
    )]
    ToolMissing(String),
    #[error("AI invocation failed: {0}")]
    Execution(#[source] ExecutionError),
    #[error("The AI response did not contain a JSON object.")]
    NoJsonObject,
    #[error("The AI response JSON has an unexpected shape: {0}")]
    InvalidShape(#[source] serde_json::Error),
}

/// Requests a component recommendation and filters it to catalog names.
pub fn recommend(
    project_dir: &Path,
    settings: &Settings,
    catalog: &ComponentsData,
    requirements: &UserRequirements,
) -> Result<SelectedComponents, RecommenderError> {
    let prompt = build_prompt(catalog, requirements);
    log::debug!("Invoking AI command: {}", settings.ai_command);

    let output =
        executor::execute_and_capture_output(&settings.ai_command, &[prompt], project_dir)
            .map_err(|e| match e {
                ExecutionError::ToolNotFound(name) => RecommenderError::ToolMissing(name),
                other => RecommenderError::Execution(other),
            })?;

    let raw = extract_json_object(&output).ok_or(RecommenderError::NoJsonObject)?;
    let selected: SelectedComponents =
        serde_json::from_str(raw).map_err(RecommenderError::InvalidShape)?;
    Ok(filter_to_catalog(selected, catalog))
}

/// Builds the recommendation prompt: the available components per category,
/// the user's requirements, and the expected reply shape.
fn build_prompt(catalog: &ComponentsData, requirements: &UserRequirements) -> String {
    let mut prompt = String::from(
        "You are selecting configuration components for a developer's project.\n\
         Available components:\n",
    );

    for category in ComponentCategory::ALL {
        let components = catalog.category(category);
        if components.is_empty() {
            continue;
        }
        let _ = writeln!(prompt, "\n{}:", category.key());
        let mut names: Vec<_> = components.keys().collect();
        names.sort();
        for name in names {
            if let Some(component) = components.get(name) {
                let _ = writeln!(prompt, "- {}: {}", name, component.description);
            }
        }
    }

    let _ = writeln!(
        prompt,
        "\nProject requirements:\n{}",
        serde_json::to_string_pretty(&Value::Object(requirements.clone()))
            .unwrap_or_else(|_| "{}".to_string())
    );
    prompt.push_str(
        "\nReply with a single JSON object of the form \
         {\"agents\":[],\"commands\":[],\"hooks\":[],\"mcps\":[]} \
         listing only component names from the lists above.",
    );
    prompt
}

/// Extracts the first balanced JSON object from free-form text.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Drops recommended names that do not exist in the catalog and deduplicates
/// while preserving first-seen order. The rest of the tool is entitled to
/// assume referential integrity of a selection that came through here.
fn filter_to_catalog(selected: SelectedComponents, catalog: &ComponentsData) -> SelectedComponents {
    let mut filtered = SelectedComponents::default();
    for category in ComponentCategory::ALL {
        let mut seen = HashSet::new();
        for name in selected.category(category) {
            if !catalog.contains(category, name) {
                log::warn!(
                    "Recommended {} '{}' is not in the catalog; dropping it.",
                    category.key(),
                    name
                );
                continue;
            }
            if seen.insert(name.clone()) {
                filtered.category_mut(category).push(name.clone());
            }
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Component;
    use std::collections::HashMap;

    fn catalog() -> ComponentsData {
        let agent = Component {
            name: "reviewer".to_string(),
            category: ComponentCategory::Agent,
            content: String::new(),
            description: "Reviews code".to_string(),
        };
        ComponentsData {
            agents: HashMap::from([("reviewer".to_string(), agent)]),
            ..Default::default()
        }
    }

    #[test]
    fn extracts_the_object_from_surrounding_prose() {
        let text = "Sure! Here is my pick:\n{\"agents\": [\"reviewer\"], \"note\": \"{not} a trap\"}\nHope that helps.";
        let raw = extract_json_object(text).unwrap();
        let value: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(value["agents"][0], "reviewer");
    }

    #[test]
    fn handles_nested_objects_and_escaped_quotes() {
        let text = r#"prefix {"a": {"b": "say \"hi\" {"}, "c": 1} suffix"#;
        let raw = extract_json_object(text).unwrap();
        assert!(serde_json::from_str::<Value>(raw).is_ok());
    }

    #[test]
    fn returns_none_without_an_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{ unbalanced"), None);
    }

    #[test]
    fn filter_drops_unknown_names_and_duplicates() {
        let selected = SelectedComponents {
            agents: vec![
                "reviewer".to_string(),
                "made-up".to_string(),
                "reviewer".to_string(),
            ],
            hooks: vec!["ghost-hook".to_string()],
            ..Default::default()
        };
        let filtered = filter_to_catalog(selected, &catalog());
        assert_eq!(filtered.agents, vec!["reviewer"]);
        assert!(filtered.hooks.is_empty());
    }

    #[test]
    fn missing_selection_keys_default_to_empty() {
        let selected: SelectedComponents =
            serde_json::from_str(r#"{"agents": ["reviewer"]}"#).unwrap();
        assert_eq!(selected.agents, vec!["reviewer"]);
        assert!(selected.mcps.is_empty());
    }
}
