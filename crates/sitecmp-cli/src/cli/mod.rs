//! CLI for sitecmp.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use sitecmp_core::config::{self, SiteCmpConfig};
use sitecmp_core::driver::{self, RunPaths};
use std::path::PathBuf;

use commands::{run_compare, run_completions, run_init, run_man};

/// Top-level CLI. With no subcommand, runs the comparison.
#[derive(Debug, Parser)]
#[command(name = "sitecmp")]
#[command(
    about = "sitecmp: compare the websites listed in a file and write an LLM report",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    #[command(flatten)]
    pub paths: PathArgs,
}

/// Optional overrides for where the source and report files live.
#[derive(Debug, Clone, Default, Args)]
pub struct PathArgs {
    /// Directory holding the source and report files (default: the executable's directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Source file with one URL per line.
    #[arg(long, global = true, value_name = "FILE")]
    pub sources: Option<PathBuf>,

    /// Report file to overwrite.
    #[arg(long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every URL in the source file and write the comparison report (default).
    Run,

    /// Create the source file with sample URLs if it does not exist.
    Init,

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

/// Source and report paths: config file names in the base directory, then flag overrides.
pub fn resolve_paths(args: &PathArgs, cfg: &SiteCmpConfig) -> Result<RunPaths> {
    let base = match &args.base_dir {
        Some(dir) => dir.clone(),
        None => driver::program_dir()?,
    };
    let mut paths = RunPaths::from_config(&base, cfg);
    if let Some(sources) = &args.sources {
        paths.sources = sources.clone();
    }
    if let Some(output) = &args.output {
        paths.report = output.clone();
    }
    Ok(paths)
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command.unwrap_or(CliCommand::Run) {
            CliCommand::Run => {
                let cfg = load_config()?;
                let paths = resolve_paths(&cli.paths, &cfg)?;
                run_compare(&cfg, paths).await?;
            }
            CliCommand::Init => {
                let cfg = load_config()?;
                let paths = resolve_paths(&cli.paths, &cfg)?;
                run_init(&paths)?;
            }
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

fn load_config() -> Result<SiteCmpConfig> {
    // A missing .env is fine; credentials may already be in the environment.
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring .env: {}", e),
    }
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}
