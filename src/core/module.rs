//! Named build steps that run between clone and build.

use serde::Serialize;
use std::path::{Component, PathBuf};

use crate::config::{ModuleConfig, ModuleKind};
use crate::error::{Error, Result};
use crate::rewrite::{self, IgnoreSet, PipelineOptions, RewritePipeline, RewriteRule, RewriteSummary};

/// What a module gets to work with during a run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Root of the cloned tree.
    pub checkout: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    pub name: String,
    pub kind: &'static str,
    #[serde(flatten)]
    pub summary: RewriteSummary,
}

pub trait Module {
    fn name(&self) -> &str;
    fn kind(&self) -> &'static str;
    fn run(&self, ctx: &RunContext, verbose: bool) -> Result<ModuleReport>;
}

/// Applies its rules across the whole checkout.
#[derive(Debug, Clone)]
pub struct RewriteModule {
    name: String,
    ignore: IgnoreSet,
    rename_paths: bool,
    rules: Vec<RewriteRule>,
}

impl RewriteModule {
    pub fn new(name: impl Into<String>, ignore: IgnoreSet, rename_paths: bool, rules: Vec<RewriteRule>) -> Self {
        Self {
            name: name.into(),
            ignore,
            rename_paths,
            rules,
        }
    }
}

impl Module for RewriteModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "rewrite"
    }

    fn run(&self, ctx: &RunContext, verbose: bool) -> Result<ModuleReport> {
        let pipeline = RewritePipeline::new(
            self.ignore.clone(),
            PipelineOptions {
                verbose,
                rename_paths: self.rename_paths,
            },
        );
        let summary = pipeline.apply(&ctx.checkout, &self.rules)?;

        Ok(ModuleReport {
            name: self.name.clone(),
            kind: self.kind(),
            summary,
        })
    }
}

/// Applies its rules, in order, to one file of the checkout.
#[derive(Debug, Clone)]
pub struct PatchModule {
    name: String,
    file: PathBuf,
    rules: Vec<RewriteRule>,
}

impl PatchModule {
    /// `file` is relative to the checkout and may not leave it.
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, rules: Vec<RewriteRule>) -> Result<Self> {
        let name = name.into();
        let file = file.into();

        let escapes = file.as_os_str().is_empty()
            || file
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(Error::config_invalid_value(
                "modules.file",
                Some(file.display().to_string()),
                format!("Patch module '{}' needs a relative path inside the checkout", name),
            ));
        }

        Ok(Self { name, file, rules })
    }
}

impl Module for PatchModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "patch"
    }

    fn run(&self, ctx: &RunContext, verbose: bool) -> Result<ModuleReport> {
        let path = ctx.checkout.join(&self.file);
        let mut changed = false;

        for rule in &self.rules {
            if rewrite::rewrite_file(&path, rule.search(), rule.replace())? {
                changed = true;
                crate::log_verbose!(verbose, "patch", "Applied {} to {}", rule, path.display());
            }
        }

        Ok(ModuleReport {
            name: self.name.clone(),
            kind: self.kind(),
            summary: RewriteSummary {
                rules_applied: self.rules.len(),
                files_modified: usize::from(changed),
                ..RewriteSummary::default()
            },
        })
    }
}

/// Build the runnable module for a config entry.
pub fn from_config(config: &ModuleConfig) -> Result<Box<dyn Module>> {
    let module: Box<dyn Module> = match &config.kind {
        ModuleKind::Rewrite {
            rename_paths, rules, ..
        } => Box::new(RewriteModule::new(
            config.name.clone(),
            config.kind.ignore_set(),
            *rename_paths,
            rules.clone(),
        )),
        ModuleKind::Patch { file, rules } => {
            Box::new(PatchModule::new(config.name.clone(), file, rules.clone())?)
        }
    };
    Ok(module)
}
