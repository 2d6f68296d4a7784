use clap::Parser;

pub mod args;
pub mod handlers;

/// configurator: an interactive, AI-assisted configuration bootstrapper.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// The command to run (`configure`, `reset`, `history`), followed by its
    /// own arguments. Each command parses its tail with its own arg struct.
    #[arg()]
    pub args: Vec<String>,
}
