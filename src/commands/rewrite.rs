use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use rebrand::io;
use rebrand::rewrite::{IgnoreSet, PipelineOptions, RewritePipeline, RewriteRule, RewriteSummary, SuffixPolicy};
use rebrand::validation;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct RewriteArgs {
    /// Root of the tree to rewrite
    pub root: PathBuf,

    /// Rewrite rule as search=replace (repeatable, applied in order)
    #[arg(long = "rule", value_name = "SEARCH=REPLACE")]
    pub rules: Vec<String>,

    /// Directory name to leave alone (repeatable)
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// How ignore entries match path tails in rename passes
    #[arg(long, value_enum, default_value_t = SuffixPolicy::Tail)]
    pub ignore_policy: SuffixPolicy,

    /// Only rewrite file contents; leave file and directory names as they are
    #[arg(long)]
    pub no_rename_paths: bool,

    /// Print every modified file and rename
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
pub struct RewriteOutput {
    command: &'static str,
    root: String,
    rules: Vec<String>,
    ignore: Vec<String>,
    ignore_policy: &'static str,
    rename_paths: bool,
    #[serde(flatten)]
    summary: RewriteSummary,
}

pub fn run(args: RewriteArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RewriteOutput> {
    validation::require_non_empty_vec(&args.rules, "rule", "Pass at least one --rule search=replace")?;
    io::require_dir(&args.root, "root")?;

    let rules = args
        .rules
        .iter()
        .map(|r| RewriteRule::parse(r))
        .collect::<rebrand::Result<Vec<_>>>()?;

    let policy = args.ignore_policy;
    let ignore = IgnoreSet::new(args.ignore.iter().cloned()).with_policy(policy);
    let options = PipelineOptions {
        verbose: args.verbose,
        rename_paths: !args.no_rename_paths,
    };

    let summary = RewritePipeline::new(ignore, options).apply(&args.root, &rules)?;

    Ok((
        RewriteOutput {
            command: "rewrite",
            root: args.root.display().to_string(),
            rules: rules.iter().map(ToString::to_string).collect(),
            ignore: args.ignore,
            ignore_policy: policy.as_str(),
            rename_paths: options.rename_paths,
            summary,
        },
        0,
    ))
}
