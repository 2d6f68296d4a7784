// src/bin/configurator.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use configurator::cli::{Cli, handlers};

// --- Command Definition and Registry ---

/// Defines a system command, its aliases, and its synchronous handler function.
/// The handler signature is kept consistent across all commands for simplicity
/// in the registry.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>) -> Result<()>,
    summary: &'static str,
}

/// The single source of truth for all system commands.
/// To add a new command, simply add a new entry to this static array.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "configure",
        aliases: &["init", "update"],
        handler: handlers::configure::handle,
        summary: "Collect requirements, get an AI recommendation, and apply it",
    },
    CommandDefinition {
        name: "reset",
        aliases: &[],
        handler: handlers::reset::handle,
        summary: "Restore the applied configuration from a backup",
    },
    CommandDefinition {
        name: "history",
        aliases: &["log"],
        handler: handlers::history::handle,
        summary: "List, inspect, or diff recorded iterations",
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// The main entry point of the `configurator` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // For all errors, print a formatted message to stderr and exit with
        // a failure code. `{:#}` includes the full context chain.
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Routes the first argument to its command handler; the remaining arguments
/// are parsed by the handler's own arg struct.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut args = cli.args.into_iter();
    let Some(action) = args.next() else {
        print_usage();
        return Ok(());
    };

    match find_command(&action) {
        Some(command) => (command.handler)(args.collect()),
        None => {
            print_usage();
            Err(anyhow::anyhow!("Unknown command '{}'.", action))
        }
    }
}

fn print_usage() {
    println!("{}", "configurator <command> [options]".bold());
    println!("\nCommands:");
    for command in COMMAND_REGISTRY {
        let aliases = if command.aliases.is_empty() {
            String::new()
        } else {
            format!(" ({})", command.aliases.join(", "))
        };
        println!(
            "  {}{}  {}",
            command.name.cyan(),
            aliases.dimmed(),
            command.summary
        );
    }
}
