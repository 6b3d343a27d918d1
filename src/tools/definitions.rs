//! tools::definitions
//!
//! Advertised tool metadata: name, description and JSON input schema.

use serde::Serialize;
use serde_json::{json, Value};

use super::operation::Operation;

const UID_DESCRIPTION: &str = "Environment ID in format: {ownerId}-{environmentId} \
     (e.g., \"31912785-b8cdb26a-0c58-4f35-9775-4945c39d7ee2\")";

/// One advertised tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    fn new(op: Operation, description: &str, input_schema: Value) -> Self {
        Self {
            name: op.tool_name().to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

fn variables_schema(description: &str) -> Value {
    json!({
        "type": "array",
        "description": description,
        "items": {
            "type": "object",
            "properties": {
                "key": { "type": "string" },
                "value": { "type": "string" },
                "type": { "type": "string", "enum": ["default", "secret"] },
                "enabled": { "type": "boolean" }
            },
            "required": ["key", "value"]
        }
    })
}

fn environment_id_only() -> Value {
    json!({
        "type": "object",
        "properties": {
            "environmentId": { "type": "string", "description": UID_DESCRIPTION }
        },
        "required": ["environmentId"]
    })
}

/// Definitions for every operation, in [`Operation::ALL`] order.
pub fn definitions() -> Vec<ToolDefinition> {
    Operation::ALL.into_iter().map(definition).collect()
}

/// Definition for one operation.
pub fn definition(op: Operation) -> ToolDefinition {
    match op {
        Operation::ListEnvironments => ToolDefinition::new(
            op,
            "List all environments in a workspace",
            json!({
                "type": "object",
                "properties": {
                    "workspace": { "type": "string", "description": "Workspace ID" }
                }
            }),
        ),
        Operation::GetEnvironment => ToolDefinition::new(
            op,
            "Get details of a specific environment",
            environment_id_only(),
        ),
        Operation::CreateEnvironment => ToolDefinition::new(
            op,
            "Create a new environment in a workspace",
            json!({
                "type": "object",
                "properties": {
                    "workspace": { "type": "string", "description": "Workspace ID" },
                    "name": { "type": "string", "description": "Environment name" },
                    "values": variables_schema("Environment variables")
                },
                "required": ["workspace", "name", "values"]
            }),
        ),
        Operation::UpdateEnvironment => ToolDefinition::new(
            op,
            "Update an existing environment. Only include variables that need to be modified.",
            json!({
                "type": "object",
                "properties": {
                    "environmentId": { "type": "string", "description": UID_DESCRIPTION },
                    "name": { "type": "string", "description": "Environment name (optional)" },
                    "values": variables_schema(
                        "Environment variables to update (optional). Only include variables that need to be modified."
                    )
                },
                "required": ["environmentId"]
            }),
        ),
        Operation::DeleteEnvironment => {
            ToolDefinition::new(op, "Delete an environment", environment_id_only())
        }
        Operation::ForkEnvironment => ToolDefinition::new(
            op,
            "Create a fork of an environment in a workspace",
            json!({
                "type": "object",
                "properties": {
                    "environmentId": { "type": "string", "description": UID_DESCRIPTION },
                    "workspace": { "type": "string", "description": "Workspace ID to fork into" },
                    "forkName": { "type": "string", "description": "Label for the fork (optional)" }
                },
                "required": ["environmentId", "workspace"]
            }),
        ),
        Operation::ListForks => ToolDefinition::new(
            op,
            "List the forks of an environment",
            json!({
                "type": "object",
                "properties": {
                    "environmentId": { "type": "string", "description": UID_DESCRIPTION },
                    "cursor": { "type": "string", "description": "Pagination cursor from a previous page" },
                    "direction": { "type": "string", "enum": ["asc", "desc"], "description": "Sort direction" },
                    "limit": { "type": "integer", "minimum": 0, "description": "Maximum forks per page" },
                    "sort": { "type": "string", "enum": ["createdAt"], "description": "Sort field" }
                },
                "required": ["environmentId"]
            }),
        ),
        Operation::MergeFork => ToolDefinition::new(
            op,
            "Merge a forked environment back into its parent",
            environment_id_only(),
        ),
        Operation::PullEnvironment => ToolDefinition::new(
            op,
            "Pull changes from the parent environment into a fork",
            environment_id_only(),
        ),
    }
}
