//! `scenmerge` command-line entry point.

use clap::{Parser, Subcommand};
use env_logger::Env;
use scenmerge::cli_args::{GlobalArgs, LockArgs, MergeArgs, ShowArgs};
use scenmerge::commands::{run_lock, run_merge, run_show};
use scenmerge::config::load_with_path_fallback;
use scenmerge::error::AppError;

#[derive(Parser)]
#[command(
    name = "scenmerge",
    version,
    about = "Merge regenerated test scenarios without losing hand-written changes"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a proposed scenario file into an existing one
    Merge(MergeArgs),
    /// List the scenarios in a file
    Show(ShowArgs),
    /// Protect scenarios from regeneration, or release them with --unlock
    Lock(LockArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.global.log_filter()))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Merge(args) => {
            let args = load_with_path_fallback(args).map_err(AppError::from)?;
            run_merge(&args)?;
        }
        Commands::Show(args) => {
            let args = load_with_path_fallback(args).map_err(AppError::from)?;
            run_show(&args)?;
        }
        Commands::Lock(args) => {
            let args = load_with_path_fallback(args).map_err(AppError::from)?;
            run_lock(&args)?;
        }
    }
    Ok(())
}
