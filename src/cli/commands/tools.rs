//! cli::commands::tools
//!
//! Print the advertised tool definitions.

use crate::tools::definitions::definitions;
use anyhow::{Context, Result};

/// Print every tool definition as a pretty JSON array.
pub fn tools() -> Result<()> {
    let text = serde_json::to_string_pretty(&definitions())
        .context("Failed to serialize tool definitions")?;
    println!("{}", text);
    Ok(())
}
