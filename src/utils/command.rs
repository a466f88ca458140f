//! Command execution primitives for external tools (git, build steps).

use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::error::CommandFailedDetails;

/// Render a program and its arguments the way a user would type them.
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a step in `dir`.
///
/// With `verbose`, the child's stdout/stderr go straight to the terminal.
/// Otherwise output is captured and only surfaces inside the failure details.
pub fn run_step(
    dir: &Path,
    program: &str,
    args: &[&str],
    verbose: bool,
) -> std::result::Result<(), CommandFailedDetails> {
    let command = display_command(program, args);
    let working_dir = Some(dir.display().to_string());

    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir).stdin(Stdio::null());

    if verbose {
        let status = cmd
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| CommandFailedDetails {
                command: command.clone(),
                exit_code: spawn_exit_code(&e),
                stderr: e.to_string(),
                working_dir: working_dir.clone(),
            })?;

        if !status.success() {
            return Err(CommandFailedDetails {
                command,
                exit_code: status.code(),
                stderr: String::new(),
                working_dir,
            });
        }
        return Ok(());
    }

    let output = cmd.output().map_err(|e| CommandFailedDetails {
        command: command.clone(),
        exit_code: spawn_exit_code(&e),
        stderr: e.to_string(),
        working_dir: working_dir.clone(),
    })?;

    if !output.status.success() {
        return Err(CommandFailedDetails {
            command,
            exit_code: output.status.code(),
            stderr: error_text(&output),
            working_dir,
        });
    }

    Ok(())
}

/// A program that cannot be spawned reports the shell's "not found" code.
fn spawn_exit_code(err: &std::io::Error) -> Option<i32> {
    (err.kind() == std::io::ErrorKind::NotFound).then_some(127)
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}
