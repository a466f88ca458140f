use clap::Args;
use serde::Serialize;

use rebrand::config::{self, ModuleKind};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct ModulesArgs {}

#[derive(Debug, Serialize)]
pub struct ModuleEntry {
    name: String,
    kind: &'static str,
    rules: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ignore: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rename_paths: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ModulesOutput {
    command: &'static str,
    modules: Vec<ModuleEntry>,
}

pub fn run(_args: ModulesArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ModulesOutput> {
    let config = config::load(global.config.as_deref())?;

    let modules = config
        .modules
        .iter()
        .map(|m| {
            let rules = m.kind.rules().iter().map(ToString::to_string).collect();
            match &m.kind {
                ModuleKind::Rewrite {
                    ignore,
                    rename_paths,
                    ..
                } => ModuleEntry {
                    name: m.name.clone(),
                    kind: m.kind.as_str(),
                    rules,
                    file: None,
                    ignore: ignore.clone(),
                    rename_paths: Some(*rename_paths),
                },
                ModuleKind::Patch { file, .. } => ModuleEntry {
                    name: m.name.clone(),
                    kind: m.kind.as_str(),
                    rules,
                    file: Some(file.clone()),
                    ignore: Vec::new(),
                    rename_paths: None,
                },
            }
        })
        .collect();

    Ok((
        ModulesOutput {
            command: "modules",
            modules,
        },
        0,
    ))
}
