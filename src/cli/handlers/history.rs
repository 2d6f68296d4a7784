// src/cli/handlers/history.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::args::HistoryArgs,
    core::{paths, tracker},
    models::ComponentCategory,
};

/// The main handler for the `history` command: list recorded iterations,
/// show one in full, or diff two of them.
pub fn handle(args: Vec<String>) -> Result<()> {
    let history_args = HistoryArgs::try_parse_from(&args)?;
    let project_dir = paths::resolve_project_dir(history_args.project.as_deref())?;

    if let [from, to] = history_args.diff.as_slice() {
        return print_diff(&project_dir, from, to);
    }
    if let Some(id) = &history_args.id {
        return print_details(&project_dir, id);
    }
    print_listing(&project_dir)
}

fn print_listing(project_dir: &std::path::Path) -> Result<()> {
    let iterations = tracker::list_iterations(project_dir)?;
    if iterations.is_empty() {
        println!(
            "No iterations recorded for project at '{}'.",
            project_dir.display()
        );
        return Ok(());
    }

    println!("Recorded iterations (newest first):");
    for summary in iterations {
        println!("  {}  {}", summary.id.cyan(), summary.timestamp.dimmed());
    }
    Ok(())
}

fn print_details(project_dir: &std::path::Path, id: &str) -> Result<()> {
    let iteration = tracker::get_iteration(project_dir, id)?;
    let json = serde_json::to_string_pretty(&iteration)
        .context("Failed to render the iteration record")?;
    println!("{json}");
    Ok(())
}

fn print_diff(project_dir: &std::path::Path, from: &str, to: &str) -> Result<()> {
    let diff = tracker::compare_iterations(project_dir, from, to)?;

    println!("Changes from {} to {}:", from.cyan(), to.cyan());
    let mut any = false;
    for category in ComponentCategory::ALL {
        let added = diff.added.category(category);
        let removed = diff.removed.category(category);
        let unchanged = diff.unchanged.category(category);
        if added.is_empty() && removed.is_empty() && unchanged.is_empty() {
            continue;
        }
        any = true;

        println!("\n  {}:", category.key().bold());
        for name in added {
            println!("    {} {}", "+".green(), name.green());
        }
        for name in removed {
            println!("    {} {}", "-".red(), name.red());
        }
        for name in unchanged {
            println!("      {}", name.dimmed());
        }
    }
    if !any {
        println!("  Both iterations have empty selections.");
    }
    Ok(())
}
