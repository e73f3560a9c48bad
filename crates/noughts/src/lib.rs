//! Noughts - terminal tic-tac-toe
//!
//! Wires the [`noughts_store`] game store to a ratatui front end.
//!
//! # Architecture
//!
//! - **Config**: TOML settings with command-line overrides
//! - **Cli**: clap command definitions
//! - **Tui**: setup form, board rendering and the event loop that drives
//!   scheduled computer moves

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod tui;

// Crate-level exports - Command line
pub use cli::{Cli, Command};

// Crate-level exports - Configuration
pub use config::{Config, ConfigError};

// Crate-level exports - Terminal UI
pub use tui::{App, run_tui};
