// src/cli/args.rs
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)] // Important: Prevents clap from expecting "configure" as the first arg
pub struct ConfigureArgs {
    /// The project directory to configure. Defaults to the current directory.
    pub project: Option<String>,

    /// Path to the component catalog JSON file.
    #[arg(long, short)]
    pub catalog: Option<String>,

    /// Do not ask for user input, use the default answer for every question.
    #[arg(long)]
    pub defaults: bool,

    /// Skip the backup step even when an applied configuration exists.
    #[arg(long)]
    pub no_backup: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct ResetArgs {
    /// The project directory to reset. Defaults to the current directory.
    pub project: Option<String>,

    /// Restore this backup (ISO-8601 timestamp or folder name) without prompting.
    #[arg(long)]
    pub backup: Option<String>,

    /// Do not ask for confirmation before overwriting the applied configuration.
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct HistoryArgs {
    /// Show the full record of one iteration instead of the listing.
    pub id: Option<String>,

    /// The project directory to inspect. Defaults to the current directory.
    #[arg(long, short)]
    pub project: Option<String>,

    /// Compare two iterations by id.
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    pub diff: Vec<String>,
}
