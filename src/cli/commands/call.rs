//! cli::commands::call
//!
//! Invoke one tool over HTTP and print the response text.
//!
//! The call is resolved and validated before the API key is read, so an
//! unknown tool or bad arguments are reported as such even without a key.
//!
//! # Example
//!
//! ```bash
//! envf call get_environment --args '{"environmentId": "123-abc"}'
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::core::config::Config;
use crate::tools::{EnvironmentTools, ToolCall};
use crate::transport::http::HttpTransport;

/// Run the call command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn call(config: &Config, name: &str, args: Option<&str>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(call_async(config, name, args))
}

/// Parse `--args`, treating an absent flag as no arguments.
fn parse_args(args: Option<&str>) -> Result<Value> {
    match args {
        Some(text) => serde_json::from_str(text).context("--args is not valid JSON"),
        None => Ok(Value::Null),
    }
}

async fn call_async(config: &Config, name: &str, args: Option<&str>) -> Result<()> {
    // Name and argument errors take precedence over a missing key
    let call = ToolCall::parse(name, parse_args(args)?)?;

    let api_key = config.api_key()?;
    let transport = HttpTransport::from_config(config, &api_key)
        .context("Failed to build HTTP client")?;
    debug!(base_url = transport.base_url(), tool = name, "calling");

    let tools = EnvironmentTools::new(Arc::new(transport));
    let response = tools.execute(call).await?;
    println!("{}", response.text());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_args_are_null() {
        assert_eq!(parse_args(None).unwrap(), Value::Null);
    }

    #[test]
    fn args_must_be_json() {
        assert!(parse_args(Some("{not json")).is_err());
        assert_eq!(
            parse_args(Some(r#"{"workspace":"w1"}"#)).unwrap()["workspace"],
            "w1"
        );
    }
}
