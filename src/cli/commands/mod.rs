//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Async Commands
//!
//! `call` performs network I/O. Its handler builds a tokio runtime and
//! blocks on the async implementation, keeping dispatch synchronous.

mod call;
mod tools;

pub use call::call;
pub use tools::tools;

use crate::cli::args::Command;
use crate::core::config::Config;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Tools => tools::tools(),
        Command::Call { name, args } => call::call(config, &name, args.as_deref()),
    }
}
