use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{build, config, modules, rewrite};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "rebrand")]
#[command(version = VERSION)]
#[command(about = "Clone a source tree, rewrite its identifiers, and build it")]
struct Cli {
    /// Config file (defaults to ~/.config/rebrand/rebrand.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone the configured repository, run modules, and build
    Build(build::BuildArgs),
    /// Rewrite identifiers across an existing tree
    Rewrite(rewrite::RewriteArgs),
    /// List configured modules
    Modules(modules::ModulesArgs),
    /// Inspect configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs { config: cli.config };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
