//! arcbench CLI
//!
//! Pushes commits to a trigger file in a source repository and measures how
//! long actions-runner-controller takes to create and then remove the
//! ephemeral runners for the resulting workflow jobs.

mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use bench_lib::Benchmark;
use clap::{error::ErrorKind, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Benchmark actions-runner-controller from trigger to drain
#[derive(Parser)]
#[command(name = "arcbench")]
#[command(author, version, about = "Benchmark actions-runner-controller from trigger to drain", long_about = None)]
pub struct Cli {
    /// Write the JSON report to this file
    #[arg(long, env = "ARCBENCH_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Working directory for the clone [default: <temp>/arcbench/<timestamp>]
    #[arg(long, env = "ARCBENCH_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Source repository, e.g. git@github.com:example/repo.git
    #[arg(long, env = "ARCBENCH_SOURCE_REPO")]
    pub source_repo: Option<String>,

    /// File in the source repository that is created or updated to trigger
    /// the workflow. Nothing else should modify it [default: trigger.txt]
    #[arg(long, env = "ARCBENCH_TRIGGER_FILE")]
    pub trigger_file: Option<PathBuf>,

    /// Namespace where the controller is running [default: arc-systems]
    #[arg(long, env = "ARCBENCH_CONTROLLER_NAMESPACE")]
    pub controller_namespace: Option<String>,

    /// Namespace where the runners are created [default: arc-runners]
    #[arg(long, env = "ARCBENCH_RUNNER_NAMESPACE")]
    pub runner_namespace: Option<String>,

    /// Number of times the trigger file is updated; one workflow job per update [default: 1]
    #[arg(long, env = "ARCBENCH_TRIGGERS")]
    pub triggers: Option<u32>,

    /// Seconds to sleep between drain polls [default: 10]
    #[arg(long, env = "ARCBENCH_POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// Fail if the runners have not drained this many seconds after the first trigger
    #[arg(long, env = "ARCBENCH_TIMEOUT")]
    pub timeout: Option<u64>,

    /// git binary [default: git]
    #[arg(long, env = "ARCBENCH_GIT")]
    pub git: Option<String>,

    /// kubectl binary [default: kubectl]
    #[arg(long, env = "ARCBENCH_KUBECTL")]
    pub kubectl: Option<String>,

    /// Config file [default: ~/.config/arcbench/config.json]
    #[arg(long, env = "ARCBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Log format
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,
}

/// Log line format on stderr
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn init_tracing(format: LogFormat, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file_config = config::Config::load(cli.config.as_deref())?;
    let settings = config::Settings::resolve(&cli, file_config);

    info!(
        git = %settings.git,
        kubectl = %settings.kubectl,
        "Starting benchmark"
    );

    let bench = Benchmark::with_binaries(settings.benchmark, &settings.git, &settings.kubectl);
    let report = bench.run().await?;

    output::print_report(&report, cli.format)?;

    if let Some(path) = &settings.output {
        output::write_report(&report, path)?;
        output::print_success(&format!("Report written to {}", path.display()));
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        // Usage errors exit 1 like every other failure
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    init_tracing(cli.log_format, cli.verbose);

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
