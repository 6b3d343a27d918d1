//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--config <path>`: Use this config file instead of the default search

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// envforge - Validated client for branching environment resources
#[derive(Parser, Debug)]
#[command(name = "envf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file to load
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the advertised tool definitions as JSON
    #[command(
        name = "tools",
        after_help = "\
EXAMPLES:
    # List every tool with its input schema
    envf tools

    # Just the names
    envf tools | jq -r '.[].name'"
    )]
    Tools,

    /// Invoke one tool and print its response text
    #[command(
        name = "call",
        long_about = "Invoke one tool against the configured environment service.\n\n\
            The API key is read from the environment variable named by \
            `api.api_key_env` in the config file (POSTMAN_API_KEY by default). \
            Arguments are passed as a single JSON object.",
        after_help = "\
EXAMPLES:
    # List environments in a workspace
    envf call list_environments --args '{\"workspace\": \"w1\"}'

    # Fork an environment, then merge the fork back
    envf call create_environment_fork --args '{\"environmentId\": \"123-abc\", \"workspace\": \"w1\"}'
    envf call merge_environment_fork --args '{\"environmentId\": \"123-def\"}'"
    )]
    Call {
        /// Tool name (see `envf tools`)
        name: String,

        /// Arguments as a JSON object
        #[arg(long, value_name = "JSON")]
        args: Option<String>,
    },
}
