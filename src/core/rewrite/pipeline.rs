use serde::Serialize;
use std::path::Path;

use super::content::rewrite_contents;
use super::directories::rename_directories;
use super::files::rename_files;
use super::filter::IgnoreSet;
use super::rule::RewriteRule;
use crate::error::{Error, Result};

/// One of the three passes run for every rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Contents,
    Files,
    Directories,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Contents => "contents",
            Phase::Files => "files",
            Phase::Directories => "directories",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub verbose: bool,
    /// When false only content passes run.
    pub rename_paths: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            rename_paths: true,
        }
    }
}

/// Counters aggregated across every rule of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteSummary {
    pub rules_applied: usize,
    pub files_modified: usize,
    pub files_renamed: usize,
    pub directories_renamed: usize,
}

/// Applies an ordered list of rules to a tree.
///
/// Each rule runs a full content pass, then a file-rename pass, then a
/// directory-rename pass, over whatever the previous rules left behind. Rules
/// are never merged or reordered, so `a -> b` followed by `b -> c` turns every
/// `a` into `c`.
#[derive(Debug, Clone, Default)]
pub struct RewritePipeline {
    ignore: IgnoreSet,
    options: PipelineOptions,
}

impl RewritePipeline {
    pub fn new(ignore: IgnoreSet, options: PipelineOptions) -> Self {
        Self { ignore, options }
    }

    /// Run every rule against `root`, stopping at the first failure.
    ///
    /// The returned error keeps the pass's code and gains `rule` and `phase`
    /// details. Work done before the failure is not undone.
    pub fn apply(&self, root: &Path, rules: &[RewriteRule]) -> Result<RewriteSummary> {
        let mut summary = RewriteSummary::default();

        for (index, rule) in rules.iter().enumerate() {
            self.apply_rule(root, rule, &mut summary)
                .map_err(|(phase, err)| annotate(err, index, rule, phase))?;
            summary.rules_applied += 1;
        }

        Ok(summary)
    }

    fn apply_rule(
        &self,
        root: &Path,
        rule: &RewriteRule,
        summary: &mut RewriteSummary,
    ) -> std::result::Result<(), (Phase, Error)> {
        let (search, replace) = (rule.search(), rule.replace());
        let verbose = self.options.verbose;

        summary.files_modified += rewrite_contents(root, search, replace, &self.ignore, verbose)
            .map_err(|e| (Phase::Contents, e))?;

        if !self.options.rename_paths {
            return Ok(());
        }

        summary.files_renamed += rename_files(root, search, replace, &self.ignore, verbose)
            .map_err(|e| (Phase::Files, e))?;
        summary.directories_renamed += rename_directories(root, search, replace, &self.ignore, verbose)
            .map_err(|e| (Phase::Directories, e))?;

        Ok(())
    }
}

fn annotate(err: Error, index: usize, rule: &RewriteRule, phase: Phase) -> Error {
    let prefix = format!("Rule {} ({}) failed during {} pass", index, rule, phase.as_str());
    err.with_detail(
        "rule",
        serde_json::json!({
            "index": index,
            "search": rule.search(),
            "replace": rule.replace(),
        }),
    )
    .with_detail("phase", serde_json::json!(phase.as_str()))
    .with_message_prefix(prefix)
}

/// Apply `rules` to `root` with a one-off pipeline and default options.
pub fn apply(root: &Path, rules: &[RewriteRule], ignore: &IgnoreSet, verbose: bool) -> Result<RewriteSummary> {
    let options = PipelineOptions {
        verbose,
        ..PipelineOptions::default()
    };
    RewritePipeline::new(ignore.clone(), options).apply(root, rules)
}
