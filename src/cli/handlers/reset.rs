// src/cli/handlers/reset.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use dialoguer::{Confirm, Select, theme::ColorfulTheme};

use crate::{
    cli::args::ResetArgs,
    core::{manager, paths},
    models::BackupInfo,
};

/// The main handler for the `reset` command: pick one of the recorded
/// backups and restore it over the applied configuration.
pub fn handle(args: Vec<String>) -> Result<()> {
    let reset_args = ResetArgs::try_parse_from(&args)?;

    let project_dir = paths::resolve_project_dir(reset_args.project.as_deref())?;
    let backups = manager::list_backups(&project_dir)?;
    if backups.is_empty() {
        println!(
            "No backups found for project at '{}'.",
            project_dir.display()
        );
        return Ok(());
    }

    let chosen = match &reset_args.backup {
        Some(wanted) => find_backup(&backups, wanted)
            .ok_or_else(|| anyhow!("No backup matching '{}' was found.", wanted))?,
        None => {
            let items: Vec<&str> = backups.iter().map(|b| b.timestamp.as_str()).collect();
            let index = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Which backup should be restored? (newest first)")
                .items(&items)
                .default(0)
                .interact()?;
            &backups[index]
        }
    };

    if !reset_args.yes
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "This will replace the current applied configuration with the backup from {}. Continue?",
                chosen.timestamp
            ))
            .default(false)
            .interact()?
    {
        println!("Aborted. Nothing was changed.");
        return Ok(());
    }

    manager::restore_backup(&project_dir, &chosen.path)?;

    println!("\n{}", "Success!".green().bold());
    println!("  Restored configuration from backup {}.", chosen.timestamp);
    Ok(())
}

/// Matches a backup by its ISO-8601 timestamp or by its folder name.
fn find_backup<'a>(backups: &'a [BackupInfo], wanted: &str) -> Option<&'a BackupInfo> {
    backups.iter().find(|b| {
        b.timestamp == wanted
            || b.path
                .file_name()
                .is_some_and(|name| name.to_string_lossy() == wanted)
    })
}
