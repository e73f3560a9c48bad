//! Command-line interface for noughts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Noughts - terminal tic-tac-toe
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Play tic-tac-toe against a friend or the computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "noughts.toml", global = true)]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Seed for the computer opponent (reproducible games)
        #[arg(long)]
        seed: Option<u64>,

        /// Pause before the computer moves, in milliseconds
        #[arg(long)]
        thinking_delay_ms: Option<u64>,
    },

    /// Print the effective configuration as TOML
    ShowConfig,
}
