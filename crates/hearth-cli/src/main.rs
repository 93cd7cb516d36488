//! Hearth CLI entry point

use std::path::Path;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hearth_cli::{
    cli::Cli,
    commands::{load_fixture, CommandDispatcher},
    config::CliAppConfig,
    error::Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration before logging so `cli.log_level` can apply
    let config = CliAppConfig::load(cli.config.as_deref().map(Path::new))?;
    setup_logging(cli.verbose || config.cli.verbose, &config.cli.log_level);

    match &cli.config {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => info!("Using default configuration"),
    }

    let fixture = load_fixture(cli.fixture.as_deref())?;
    let dispatcher = CommandDispatcher::new(config, fixture);

    let mut stdout = std::io::stdout();
    if let Err(e) = dispatcher.execute(cli.command, &mut stdout).await {
        error!("Command execution failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Setup logging based on verbosity and the configured level.
///
/// `RUST_LOG` takes precedence over both when set.
fn setup_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
