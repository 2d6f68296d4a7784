// src/system/executor.rs

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("External tool '{0}' was not found on PATH.")]
    ToolNotFound(String),
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{0}' exited with a non-zero error code.")]
    NonZeroExitStatus(String),
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Executes a command line (split with shell-like rules) with extra trailing
/// arguments, capturing its standard output. Stderr is passed through to the
/// user's terminal.
///
/// Intended for short-running collaborator invocations such as the AI CLI.
pub fn execute_and_capture_output(
    command_line: &str,
    extra_args: &[String],
    cwd: &Path,
) -> Result<String, ExecutionError> {
    let trimmed_command = command_line.trim();
    if trimmed_command.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    let mut parts = shlex::split(trimmed_command)
        .ok_or_else(|| ExecutionError::CommandParse(trimmed_command.to_string()))?;
    if parts.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    parts.extend(extra_args.iter().cloned());

    let program = parts[0].clone();
    let clean_cwd = dunce::simplified(cwd);

    let command_output = StdCommand::new(&program)
        .args(&parts[1..])
        .current_dir(clean_cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| spawn_error(&program, trimmed_command, e))?;

    if !command_output.status.success() {
        return Err(ExecutionError::NonZeroExitStatus(
            trimmed_command.to_string(),
        ));
    }

    String::from_utf8(command_output.stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
        command: trimmed_command.to_string(),
        source: e,
    })
}

/// Runs a program with explicit arguments, inheriting stdout/stderr, and
/// fails on a non-zero exit status.
///
/// Used for per-integration registration calls, where the caller decides
/// whether a failure aborts the batch.
pub fn run_with_args(program: &str, args: &[String], cwd: &Path) -> Result<(), ExecutionError> {
    if program.trim().is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    let clean_cwd = dunce::simplified(cwd);
    let display = display_command(program, args);

    let status = StdCommand::new(program)
        .args(args)
        .current_dir(clean_cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| spawn_error(program, &display, e))?;

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus(display));
    }
    Ok(())
}

fn spawn_error(program: &str, display: &str, e: std::io::Error) -> ExecutionError {
    if e.kind() == ErrorKind::NotFound {
        ExecutionError::ToolNotFound(program.to_string())
    } else {
        ExecutionError::CommandFailed(display.to_string(), e)
    }
}

fn display_command(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().cloned());
    shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        std::env::temp_dir()
    }

    #[test]
    fn empty_command_line_is_rejected() {
        let result = execute_and_capture_output("   ", &[], &cwd());
        assert!(matches!(result, Err(ExecutionError::EmptyCommand)));
    }

    #[test]
    fn missing_tool_is_reported_by_name() {
        let result = run_with_args("definitely-not-a-real-tool-xyz", &[], &cwd());
        assert!(matches!(
            result,
            Err(ExecutionError::ToolNotFound(name)) if name == "definitely-not-a-real-tool-xyz"
        ));
    }
}
