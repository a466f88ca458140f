use std::path::PathBuf;

pub type CmdResult<T> = rebrand::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Config file requested with --config.
    pub config: Option<PathBuf>,
}

pub mod build;
pub mod config;
pub mod modules;
pub mod rewrite;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (rebrand::Result<serde_json::Value>, i32) {
    crate::tty::status("rebrand is working...");

    match command {
        crate::Commands::Build(args) => dispatch!(args, global, build),
        crate::Commands::Rewrite(args) => dispatch!(args, global, rewrite),
        crate::Commands::Modules(args) => dispatch!(args, global, modules),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
