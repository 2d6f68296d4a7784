// src/core/requirements.rs

use crate::models::UserRequirements;
use anyhow::Result;
use dialoguer::{Input, MultiSelect, Select, theme::ColorfulTheme};
use serde_json::{Value, json};

const PROJECT_TYPES: &[&str] = &["web-api", "cli-tool", "library", "data-pipeline", "other"];
const EXPERIENCE_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];
const WORKFLOW_PRIORITIES: &[&str] = &[
    "code-review",
    "testing",
    "documentation",
    "refactoring",
    "deployment",
    "debugging",
];

/// Collects the user's project requirements through interactive prompts.
///
/// The resulting map is opaque to the rest of the tool: it is handed to the
/// recommender and stored verbatim in the iteration record. With
/// `defaults_only` every question resolves to its default answer, for
/// scripted runs.
pub fn collect(defaults_only: bool) -> Result<UserRequirements> {
    let mut requirements = UserRequirements::new();

    requirements.insert(
        "project-description".to_string(),
        Value::String(resolve_description(defaults_only)?),
    );
    requirements.insert(
        "project-type".to_string(),
        Value::String(resolve_choice("Project type", PROJECT_TYPES, 0, defaults_only)?),
    );
    requirements.insert(
        "experience-level".to_string(),
        Value::String(resolve_choice(
            "Experience with agentic tooling",
            EXPERIENCE_LEVELS,
            1,
            defaults_only,
        )?),
    );
    requirements.insert(
        "workflow-priorities".to_string(),
        json!(resolve_priorities(defaults_only)?),
    );
    requirements.insert(
        "extra-notes".to_string(),
        Value::String(resolve_notes(defaults_only)?),
    );

    Ok(requirements)
}

fn resolve_description(defaults_only: bool) -> Result<String> {
    if defaults_only {
        return Ok(String::new());
    }
    Ok(Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Describe your project in one or two sentences")
        .allow_empty(true)
        .interact_text()?)
}

fn resolve_choice(
    prompt: &str,
    options: &[&str],
    default_index: usize,
    defaults_only: bool,
) -> Result<String> {
    if defaults_only {
        return Ok(options[default_index].to_string());
    }
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(options)
        .default(default_index)
        .interact()?;
    Ok(options[selection].to_string())
}

fn resolve_priorities(defaults_only: bool) -> Result<Vec<String>> {
    if defaults_only {
        return Ok(vec!["code-review".to_string(), "testing".to_string()]);
    }
    let selections = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Which workflows matter most? (space to toggle)")
        .items(WORKFLOW_PRIORITIES)
        .interact()?;
    Ok(selections
        .into_iter()
        .filter_map(|i| WORKFLOW_PRIORITIES.get(i).map(|s| s.to_string()))
        .collect())
}

fn resolve_notes(defaults_only: bool) -> Result<String> {
    if defaults_only {
        return Ok(String::new());
    }
    Ok(Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Anything else the recommendation should consider?")
        .allow_empty(true)
        .interact_text()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_answers_cover_every_question() {
        let requirements = collect(true).unwrap();
        for key in [
            "project-description",
            "project-type",
            "experience-level",
            "workflow-priorities",
            "extra-notes",
        ] {
            assert!(requirements.contains_key(key), "missing answer for {key}");
        }
        assert_eq!(requirements["project-type"], "web-api");
        assert!(requirements["workflow-priorities"].is_array());
    }
}
