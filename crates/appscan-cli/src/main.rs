use std::process::ExitCode;

use anyhow::Context;
use appscan_config::AppScanConfig;
use appscan_discovery::DiscoveryError;
use clap::Parser;

mod cli;
mod commands;
mod output;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("appscan error: {error:#}");
            ExitCode::from(exit_code(&error))
        }
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    let config = AppScanConfig::load_with_dotenv(flags.config.as_deref())
        .context("failed to load configuration")?;

    commands::dispatch(&cli.command, &config, &flags)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("APPSCAN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Process exit status for a failed run.
fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<DiscoveryError>() {
        Some(DiscoveryError::NotFound { .. }) => 2,
        Some(DiscoveryError::Ambiguous { .. }) => 3,
        Some(DiscoveryError::Resolution(_)) => 4,
        Some(DiscoveryError::Capability { .. }) => 5,
        Some(DiscoveryError::Cancelled) => 6,
        Some(DiscoveryError::InvalidPath { .. } | DiscoveryError::Load(_)) | None => 1,
    }
}
