// src/core/manager.rs
//
// Snapshots the applied-config folder before it is overwritten, materializes
// a selection into it, and restores snapshots on demand. Every operation is
// a one-shot transaction over the filesystem: the "current configuration" is
// exactly what's on disk at the applied-config path.

use crate::constants::BACKUP_PREFIX;
use crate::core::settings::Settings;
use crate::core::{paths, stamp};
use crate::models::{
    BackupInfo, ComponentCategory, ComponentPayload, ComponentsData, RemoteIntegrationSpec,
    SelectedComponents,
};
use crate::system::executor::{self, ExecutionError};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

lazy_static! {
    /// Matches `backup-<dashed ISO-8601 timestamp>` folder names. Anything
    /// else inside the backups directory is ignored.
    static ref BACKUP_NAME_RE: Regex =
        Regex::new(r"^backup-(\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2}-\d{3}Z)$")
            .expect("backup name pattern is a valid regex");
}

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("There is no applied configuration at '{path}' to back up.")]
    NothingToBackUp { path: String },
    #[error("Failed to copy '{src}' to '{dst}': {source}")]
    Copy {
        src: String,
        dst: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Backup folder '{path}' does not exist.")]
    BackupMissing { path: String },
    #[error("Failed to restore backup into '{path}': {source}")]
    Restore {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

type ManagerResult<T> = Result<T, ManagerError>;

/// Whether the project already has an applied-config folder.
/// Absence is a normal state, not an error.
pub fn target_folder_exists(project_dir: &Path) -> bool {
    paths::applied_config_dir(project_dir).is_dir()
}

/// Snapshots the applied-config folder into a timestamped backup directory
/// and returns its location.
///
/// The snapshot is a full recursive copy; any failure aborts the whole
/// backup, and the caller must treat an error as "backup did not happen".
pub fn backup_folder(project_dir: &Path) -> ManagerResult<BackupInfo> {
    let src = paths::applied_config_dir(project_dir);
    if !src.is_dir() {
        return Err(ManagerError::NothingToBackUp {
            path: src.display().to_string(),
        });
    }

    let timestamp = stamp::now_iso();
    let backup_path =
        paths::backups_dir(project_dir).join(format!("{BACKUP_PREFIX}-{}", stamp::to_dashed(&timestamp)));
    fs::create_dir_all(&backup_path)?;
    copy_tree(&src, &backup_path)?;

    log::debug!("Backed up '{}' to '{}'", src.display(), backup_path.display());
    Ok(BackupInfo {
        timestamp,
        path: backup_path,
    })
}

/// Materializes a selection into the applied-config folder.
///
/// File-backed categories get one `<category>/<name>.md` file per selected
/// component, content written verbatim. Remote integrations are registered
/// through the configured external command instead; each registration is
/// independent, so one failure is logged and the rest still run.
///
/// A selected name missing from the catalog is skipped: upstream filtering
/// should prevent it, but a stale reference must not crash the apply.
pub fn apply_configuration(
    project_dir: &Path,
    selected: &SelectedComponents,
    catalog: &ComponentsData,
    settings: &Settings,
) -> ManagerResult<()> {
    let root = paths::applied_config_dir(project_dir);

    for category in ComponentCategory::ALL {
        let names = selected.category(category);
        if names.is_empty() {
            continue;
        }

        let category_dir = root.join(category.dir_name());
        if !category.is_remote() {
            fs::create_dir_all(&category_dir)?;
        }

        for name in names {
            let Some(component) = catalog.lookup(category, name) else {
                log::debug!(
                    "Selected {} '{}' is not in the catalog; skipping.",
                    category.key(),
                    name
                );
                continue;
            };
            match ComponentPayload::of(component) {
                Ok(ComponentPayload::Text(content)) => {
                    fs::write(category_dir.join(format!("{name}.md")), content)?;
                }
                Ok(ComponentPayload::RemoteIntegration(spec)) => {
                    if let Err(e) = register_one(project_dir, name, &spec, settings) {
                        log::warn!("Failed to register integration '{}': {}", name, e);
                    }
                }
                // Only remote payloads can fail to parse.
                Err(e) => {
                    log::warn!("Skipping integration '{}': {}", name, e);
                }
            }
        }
    }

    Ok(())
}

/// Lists existing backups, newest first.
///
/// Only directories whose name matches the backup naming convention count;
/// the embedded timestamp is restored to its ISO-8601 form for display and
/// ordering. A missing backups directory yields an empty list.
pub fn list_backups(project_dir: &Path) -> ManagerResult<Vec<BackupInfo>> {
    let dir = paths::backups_dir(project_dir);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut backups = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(dashed) = BACKUP_NAME_RE
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            continue;
        };
        let Some(timestamp) = stamp::from_dashed(dashed) else {
            continue;
        };
        backups.push(BackupInfo { timestamp, path });
    }

    backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(backups)
}

/// Replaces the applied-config folder with the contents of a backup.
///
/// The backup is first copied into a staging directory next to the live
/// folder; only once that copy has fully succeeded is the live folder
/// removed and the staging directory renamed into its place. A copy failure
/// therefore surfaces before anything has been deleted.
pub fn restore_backup(project_dir: &Path, backup_path: &Path) -> ManagerResult<()> {
    if !backup_path.is_dir() {
        return Err(ManagerError::BackupMissing {
            path: backup_path.display().to_string(),
        });
    }

    let configurator_dir = paths::configurator_dir(project_dir);
    fs::create_dir_all(&configurator_dir)?;
    let staging = tempfile::Builder::new()
        .prefix("restore-")
        .tempdir_in(&configurator_dir)?;
    copy_tree(backup_path, staging.path())?;

    let target = paths::applied_config_dir(project_dir);
    if target.exists() {
        fs::remove_dir_all(&target).map_err(|e| ManagerError::Restore {
            path: target.display().to_string(),
            source: e,
        })?;
    }

    let staged = staging.keep();
    if let Err(e) = fs::rename(&staged, &target) {
        let _ = fs::remove_dir_all(&staged);
        return Err(ManagerError::Restore {
            path: target.display().to_string(),
            source: e,
        });
    }

    log::debug!(
        "Restored '{}' from backup '{}'",
        target.display(),
        backup_path.display()
    );
    Ok(())
}

/// Recursively copies a directory tree, preserving relative structure and
/// file contents exactly. Any failure identifies both endpoints.
fn copy_tree(src: &Path, dst: &Path) -> ManagerResult<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| copy_err(src, dst, e.into()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| copy_err(entry.path(), dst, std::io::Error::other(e)))?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| copy_err(entry.path(), &target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| copy_err(entry.path(), &target, e))?;
        }
    }
    Ok(())
}

fn copy_err(src: &Path, dst: &Path, source: std::io::Error) -> ManagerError {
    ManagerError::Copy {
        src: src.display().to_string(),
        dst: dst.display().to_string(),
        source,
    }
}

/// Builds and runs one `<mcp_command> mcp add <name> [-e K=V]... -- <cmd> [args...]`
/// invocation.
fn register_one(
    project_dir: &Path,
    name: &str,
    spec: &RemoteIntegrationSpec,
    settings: &Settings,
) -> Result<(), ExecutionError> {
    let mut parts = shlex::split(&settings.mcp_command)
        .ok_or_else(|| ExecutionError::CommandParse(settings.mcp_command.clone()))?;
    let program = match parts.first() {
        Some(program) => program.clone(),
        None => return Err(ExecutionError::EmptyCommand),
    };

    let mut args: Vec<String> = parts.split_off(1);
    args.push("mcp".to_string());
    args.push("add".to_string());
    args.push(name.to_string());

    // Sorted for a deterministic invocation.
    let mut env_pairs: Vec<_> = spec.env.iter().collect();
    env_pairs.sort_by_key(|(k, _)| k.as_str());
    for (key, value) in env_pairs {
        args.push("-e".to_string());
        args.push(format!("{key}={value}"));
    }

    args.push("--".to_string());
    args.push(spec.command.clone());
    args.extend(spec.args.iter().cloned());

    executor::run_with_args(&program, &args, project_dir)
}
