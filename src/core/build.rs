use serde::Serialize;
use std::path::Path;

use crate::config::BuildStep;
use crate::error::{Error, Result};
use crate::utils::command;

#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    pub steps: Vec<String>,
    pub working_dir: String,
}

/// Run every build step, in order, inside the checkout.
///
/// Stops at the first failing step.
pub fn run_steps(checkout: &Path, steps: &[BuildStep], verbose: bool) -> Result<BuildOutput> {
    if !checkout.is_dir() {
        return Err(Error::internal_io(
            format!("build directory not found: {}", checkout.display()),
            Some("build".to_string()),
        ));
    }

    let mut ran = Vec::with_capacity(steps.len());
    for step in steps {
        let args: Vec<&str> = step.args.iter().map(String::as_str).collect();
        let display = command::display_command(&step.program, &args);
        crate::log_verbose!(verbose, "build", "Running {}", display);

        command::run_step(checkout, &step.program, &args, verbose).map_err(Error::build_command_failed)?;
        ran.push(display);
    }

    Ok(BuildOutput {
        steps: ran,
        working_dir: checkout.display().to_string(),
    })
}
