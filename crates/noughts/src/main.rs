//! Noughts - terminal tic-tac-toe

use anyhow::{Context, Result};
use clap::Parser;
use noughts::{Cli, Command, Config, run_tui};
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            seed,
            thinking_delay_ms,
        } => run_play(&cli.config, seed, thinking_delay_ms).await,
        Command::ShowConfig => show_config(&cli.config),
    }
}

/// Run the terminal game
async fn run_play(
    config_path: &Path,
    seed: Option<u64>,
    thinking_delay_ms: Option<u64>,
) -> Result<()> {
    let config = Config::load_or_default(config_path)?.with_overrides(seed, thinking_delay_ms);
    initialize_file_tracing(&config)?;
    info!(config = ?config, "Configuration resolved");
    run_tui(&config).await
}

/// Print the effective configuration
fn show_config(config_path: &Path) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default(config_path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Send traces to the log file; the terminal belongs to the UI.
#[instrument(skip(config))]
fn initialize_file_tracing(config: &Config) -> Result<()> {
    let log_file = std::fs::File::create(config.log_file()).with_context(|| {
        format!("Failed to create log file {}", config.log_file().display())
    })?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(log_file = %config.log_file().display(), "Tracing initialized");
    Ok(())
}
