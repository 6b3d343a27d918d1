//! tools
//!
//! Host-facing surface: named operations over an untyped argument bag.
//!
//! # Architecture
//!
//! - [`operation`] - The closed set of operations and their names
//! - [`args`] - Typed argument structs and boundary validation
//! - [`call`] - Name resolution plus every local check, before any request
//! - [`environments`] - The operations themselves
//! - [`classify`] - Transport failure → caller error mapping
//! - [`definitions`] - Advertised names, descriptions and input schemas
//! - [`error`] - Caller-facing error taxonomy
//!
//! A host calls [`ToolHandler::handle_tool_call`] with a name and a JSON
//! bag. Unknown names fail with `MethodNotFound` before any validation;
//! known names decode their bag into a [`ToolCall`], run the operation, and
//! wrap the result in a [`ToolResponse`]. Hosts that need to validate before
//! they can build a transport call [`ToolCall::parse`] and
//! [`EnvironmentTools::execute`] separately.

pub mod args;
pub mod call;
pub mod classify;
pub mod definitions;
pub mod environments;
pub mod error;
pub mod operation;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

pub use call::ToolCall;
pub use definitions::ToolDefinition;
pub use environments::{EnvironmentTools, ForkListing};
pub use error::{ErrorKind, ToolError};
pub use operation::Operation;

/// One block of response content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// Response envelope returned to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<Content>,
}

impl ToolResponse {
    /// Wrap a JSON result as pretty-printed text.
    pub fn json(value: &Value) -> Self {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        Self {
            content: vec![Content::Text { text }],
        }
    }

    /// Concatenated text of every content block.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|Content::Text { text }| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A set of named tools a host can advertise and invoke.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Every tool this handler answers to.
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Invoke `name` with a JSON argument bag.
    async fn handle_tool_call(&self, name: &str, args: Value) -> Result<ToolResponse, ToolError>;
}

impl EnvironmentTools {
    /// Run a parsed call and wrap its result.
    pub async fn execute(&self, call: ToolCall) -> Result<ToolResponse, ToolError> {
        info!(operation = %call.operation(), "tool call");

        let result = match call {
            ToolCall::ListEnvironments(a) => self.list_environments(a.workspace.as_deref()).await?,
            ToolCall::GetEnvironment(a) => self.get_environment(&a.environment_id).await?,
            ToolCall::CreateEnvironment(a) => {
                self.create_environment(&a.workspace, &a.name, a.values)
                    .await?
            }
            ToolCall::UpdateEnvironment(a) => {
                self.update_environment(&a.environment_id, a.name.as_deref(), a.values)
                    .await?
            }
            ToolCall::DeleteEnvironment(a) => self.delete_environment(&a.environment_id).await?,
            ToolCall::ForkEnvironment(a) => {
                self.fork_environment(&a.environment_id, &a.workspace, a.fork_name.as_deref())
                    .await?
            }
            ToolCall::ListForks(a) => {
                let listing = ForkListing {
                    cursor: a.cursor,
                    direction: a.direction,
                    limit: a.limit,
                    sort: a.sort,
                };
                self.get_environment_forks(&a.environment_id, listing)
                    .await?
            }
            ToolCall::MergeFork(a) => self.merge_environment_fork(&a.environment_id).await?,
            ToolCall::PullEnvironment(a) => self.pull_environment(&a.environment_id).await?,
        };

        Ok(ToolResponse::json(&result))
    }
}

#[async_trait]
impl ToolHandler for EnvironmentTools {
    fn definitions(&self) -> Vec<ToolDefinition> {
        definitions::definitions()
    }

    async fn handle_tool_call(&self, name: &str, args: Value) -> Result<ToolResponse, ToolError> {
        let call = ToolCall::parse(name, args)?;
        self.execute(call).await
    }
}
