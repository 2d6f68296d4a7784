// src/core/paths.rs

use crate::constants::{
    APPLIED_CONFIG_DIR, BACKUPS_DIR, CONFIGURATOR_DIR, ITERATIONS_DIR, SETTINGS_FILENAME,
};
use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref USER_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the path to the user-level configurator directory
/// (`~/.config/configurator`). Creates it if it doesn't exist.
///
/// Memoized: the first call computes and caches the path, subsequent calls
/// return the cached value.
pub fn get_user_config_dir() -> Result<PathBuf, PathError> {
    let mut cached_path_guard = USER_CONFIG_DIR
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join("configurator");

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path to the user-level `settings.toml`.
pub fn get_user_settings_path() -> Result<PathBuf, PathError> {
    get_user_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// Resolves a user-supplied project directory argument into a clean absolute
/// path, expanding `~` and environment variables. Defaults to the current
/// working directory when no argument was given.
///
/// # Errors
/// Returns an error if expansion fails or the resolved path is not an
/// existing directory.
pub fn resolve_project_dir(arg: Option<&str>) -> Result<PathBuf> {
    let raw = match arg {
        Some(raw) => {
            let expanded = shellexpand::full(raw)
                .map_err(|e| anyhow!("Failed to expand project path '{}': {}", raw, e))?;
            PathBuf::from(expanded.into_owned())
        }
        None => std::env::current_dir()?,
    };

    if !raw.is_dir() {
        return Err(anyhow!(
            "Project directory '{}' does not exist or is not a directory.",
            raw.display()
        ));
    }

    Ok(dunce::canonicalize(&raw)?)
}

/// `<project>/.configurator`
pub fn configurator_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIGURATOR_DIR)
}

/// `<project>/.configurator/iterations`
pub fn iterations_dir(project_dir: &Path) -> PathBuf {
    configurator_dir(project_dir).join(ITERATIONS_DIR)
}

/// `<project>/.configurator/backups`
pub fn backups_dir(project_dir: &Path) -> PathBuf {
    configurator_dir(project_dir).join(BACKUPS_DIR)
}

/// `<project>/.claude` — the applied-configuration folder.
pub fn applied_config_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(APPLIED_CONFIG_DIR)
}
