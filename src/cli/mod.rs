//! cli
//!
//! Command-line interface layer for envforge.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Load configuration and delegate to command handlers
//!
//! The CLI layer is thin. Operations, validation and error classification
//! live in [`crate::tools`]; this layer only wires a transport to them and
//! prints results.

pub mod args;
pub mod commands;

pub use args::Cli;

use crate::core::config::Config;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    commands::dispatch(cli.command, &config)
}

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, or `debug`
/// under `--debug`.
fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
