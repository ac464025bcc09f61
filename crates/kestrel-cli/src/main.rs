use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

use kestrel_cli::commands;
use kestrel_cli::config::Config;

#[derive(Parser)]
#[command(name = "kestrel")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Aggregate nginx access-log latency into ranked HTML reports",
    long_about = "Kestrel picks the most recent nginx UI access log from the log directory, \
                  aggregates per-endpoint request latency, and renders the slowest endpoints \
                  into a static HTML report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the latest access log and write the HTML report
    Run {
        /// Path to a JSON config file overriding the built-in defaults
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Process at most LIMIT+1 lines (smoke/diagnostic runs)
        #[arg(long, value_name = "LIMIT")]
        limit: Option<usize>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, limit } => {
            let config = Config::load(config.as_deref())?;
            init_logging(cli.verbose, config.logging_path.as_deref())?;
            commands::run::execute(&config, limit)
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            commands::completion::execute(shell, &mut cmd)
        }
    }
}

fn init_logging(verbose: bool, logging_path: Option<&Path>) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("kestrel=debug,kestrel_cli=debug,kestrel_core=debug")
    } else {
        EnvFilter::new("kestrel=info,kestrel_cli=info,kestrel_core=info")
    };

    match logging_path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .without_time()
                .init();
        }
    }

    Ok(())
}
