// src/core/settings.rs

use crate::core::paths;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;

/// Optional user-level settings from `~/.config/configurator/settings.toml`.
/// Every field has a default, so a missing file is a normal state.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Settings {
    /// The command line used to ask the AI for a recommendation. The prompt
    /// is appended as the final argument.
    pub ai_command: String,
    /// The command used to register remote integrations (`<cmd> mcp add ...`).
    pub mcp_command: String,
    /// Overrides the default catalog location (`<project>/.configurator/components.json`).
    pub catalog_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai_command: "claude -p".to_string(),
            mcp_command: "claude".to_string(),
            catalog_path: None,
        }
    }
}

impl Settings {
    /// Loads settings from the user config directory, falling back to
    /// defaults when no settings file exists.
    pub fn load() -> Result<Self> {
        let path = paths::get_user_settings_path()?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No settings file at '{}', using defaults.", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read settings file '{}'", path.display()));
            }
        };
        toml::from_str(&text)
            .with_context(|| format!("Settings file '{}' is not valid TOML", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_used_for_missing_keys() {
        let settings: Settings = toml::from_str("ai_command = \"my-ai --fast\"").unwrap();
        assert_eq!(settings.ai_command, "my-ai --fast");
        assert_eq!(settings.mcp_command, "claude");
        assert_eq!(settings.catalog_path, None);
    }

    #[test]
    fn empty_file_yields_full_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.ai_command, "claude -p");
    }
}
