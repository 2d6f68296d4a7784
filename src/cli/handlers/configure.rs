// src/cli/handlers/configure.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::path::{Path, PathBuf};

use crate::{
    cli::args::ConfigureArgs,
    constants::CATALOG_FILENAME,
    core::{catalog, manager, paths, recommender, requirements, settings::Settings, tracker},
    models::{ComponentCategory, SelectedComponents},
};

/// The main handler for the `configure` command: the full workflow from
/// requirement collection to the recorded iteration, as a linear sequence
/// of steps. Any step failure aborts the run with context.
pub fn handle(args: Vec<String>) -> Result<()> {
    let configure_args = ConfigureArgs::try_parse_from(&args)?;

    let project_dir = paths::resolve_project_dir(configure_args.project.as_deref())?;
    println!("Configuring project at: {}", project_dir.display());

    let settings = Settings::load()?;

    // 1. Load the component catalog.
    let catalog_path = resolve_catalog_path(&configure_args, &settings, &project_dir);
    let catalog = catalog::load_catalog(&catalog_path)?;
    if catalog.is_empty() {
        return Err(anyhow!(
            "The catalog at '{}' contains no components.",
            catalog_path.display()
        ));
    }
    println!(
        "Loaded {} components from '{}'.",
        catalog.len(),
        catalog_path.display()
    );

    // 2. Collect requirements.
    let collected = requirements::collect(configure_args.defaults)
        .context("Failed to collect project requirements")?;

    // 3. Ask the AI for a recommendation, already filtered to catalog names.
    println!("\nRequesting a component recommendation...");
    let selected = recommender::recommend(&project_dir, &settings, &catalog, &collected)?;
    if selected.is_empty() {
        println!("The recommendation selected no components. Nothing to apply.");
        return Ok(());
    }

    print_selection(&selected);

    if !configure_args.defaults
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Apply this configuration?")
            .default(true)
            .interact()?
    {
        println!("Aborted. Nothing was changed.");
        return Ok(());
    }

    // 4. Snapshot the existing applied configuration before overwriting it.
    if manager::target_folder_exists(&project_dir) && !configure_args.no_backup {
        let backup = manager::backup_folder(&project_dir)
            .context("Could not back up the existing configuration")?;
        println!(
            "Backed up existing configuration to: {}",
            backup.path.display()
        );
    }

    // 5. Apply, then record the run.
    manager::apply_configuration(&project_dir, &selected, &catalog, &settings)
        .context("Failed to apply the configuration")?;
    let iteration_id = tracker::save_iteration(&project_dir, &selected, &collected)
        .context("The configuration was applied, but recording the iteration failed")?;

    println!("\n{}", "Success!".green().bold());
    println!("  Applied {} components.", selected.len());
    println!("  Recorded iteration '{}'.", iteration_id);
    Ok(())
}

/// Catalog location precedence: `--catalog` flag, then the settings override,
/// then `<project>/.configurator/components.json`.
fn resolve_catalog_path(args: &ConfigureArgs, settings: &Settings, project_dir: &Path) -> PathBuf {
    if let Some(flag) = &args.catalog {
        return PathBuf::from(flag);
    }
    if let Some(configured) = &settings.catalog_path {
        return PathBuf::from(configured);
    }
    paths::configurator_dir(project_dir).join(CATALOG_FILENAME)
}

fn print_selection(selected: &SelectedComponents) {
    println!("\nRecommended configuration:");
    for category in ComponentCategory::ALL {
        let names = selected.category(category);
        if names.is_empty() {
            continue;
        }
        println!("  {}:", category.key().bold());
        for name in names {
            println!("    - {}", name.cyan());
        }
    }
}
