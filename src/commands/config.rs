use clap::{Args, Subcommand};
use serde::Serialize;

use rebrand::config::{self, RebrandConfig};

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display the effective configuration
    Show {
        /// Show only built-in defaults (ignore rebrand.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Show the path to the config file in use
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<RebrandConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
}

pub fn run(args: ConfigArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin, global),
        ConfigCommand::Path => path(global),
    }
}

fn show(builtin: bool, global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    let config = if builtin {
        RebrandConfig::default()
    } else {
        config::load(global.config.as_deref())?
    };

    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            config: Some(config),
            path: None,
            exists: None,
        },
        0,
    ))
}

fn path(global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    let path = match &global.config {
        Some(explicit) => explicit.clone(),
        None => config::config_path()?,
    };

    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            config: None,
            exists: Some(path.exists()),
            path: Some(path.display().to_string()),
        },
        0,
    ))
}
