use clap::Args;
use rebrand::builder::{BuildReport, Builder};
use rebrand::config;
use rebrand::validation;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct BuildArgs {
    /// Target version to build (falls back to the configured default target)
    #[arg(long, env = "TARGET_VERSION")]
    pub target: Option<String>,

    /// Comma-separated list of modules to run, or "all"
    #[arg(long, default_value = "")]
    pub modules: String,

    /// Show git and build output
    #[arg(long)]
    pub verbose: bool,
}

pub fn run(args: BuildArgs, global: &crate::commands::GlobalArgs) -> CmdResult<BuildReport> {
    let config = config::load(global.config.as_deref())?;
    let target = args
        .target
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| config.default_target.clone());
    let modules = validation::split_list(&args.modules);

    let builder = Builder::from_config(config, args.verbose)?;
    let report = builder.run(&target, &modules)?;

    Ok((report, 0))
}
