//! tools::args
//!
//! Typed argument structs, validated once at the boundary.
//!
//! # Design
//!
//! A host hands each operation an untyped JSON argument bag.
//! [`validate_args`] decodes it into the operation's struct and runs the
//! struct's shape check; any failure is an `InvalidRequest` carrying the
//! operation's fixed message. Downstream code only ever sees the typed
//! struct.
//!
//! Identifier and listing-parameter checks ([`validate_uid`],
//! [`validate_direction`], [`validate_sort`]) run right after, still before
//! any request is issued.
//!
//! # Example
//!
//! ```
//! use envforge::tools::args::{validate_args, CreateEnvironmentArgs};
//! use serde_json::json;
//!
//! let args: CreateEnvironmentArgs = validate_args(
//!     json!({"workspace": "w1", "name": "Env", "values": [{"key": "a", "value": "1"}]}),
//!     "Invalid create environment arguments",
//! ).unwrap();
//! assert_eq!(args.values.len(), 1);
//!
//! let bad = validate_args::<CreateEnvironmentArgs>(
//!     json!({"workspace": "w1", "name": "Env", "values": [{"key": "a"}]}),
//!     "Invalid create environment arguments",
//! );
//! assert!(bad.is_err());
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::ToolError;
use crate::core::types::{Direction, SortField, VariableInput};
use crate::core::uid::Uid;

pub const INVALID_UID: &str =
    "Invalid environment ID format. Expected format: {ownerId}-{environmentId}";
pub const INVALID_DIRECTION: &str = "Direction must be either \"asc\" or \"desc\"";
pub const INVALID_SORT: &str = "Sort must be \"createdAt\"";

/// An operation's argument struct.
pub trait ToolArgs: DeserializeOwned {
    /// Shape checks beyond what deserialization enforces.
    fn is_well_formed(&self) -> bool {
        true
    }
}

/// Decode and shape-check an argument bag.
///
/// A `null` bag is treated as an empty object so operations whose
/// arguments are all optional can be called without any.
pub fn validate_args<T: ToolArgs>(args: Value, message: &str) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Map::new())
    } else {
        args
    };

    match serde_json::from_value::<T>(args) {
        Ok(parsed) if parsed.is_well_formed() => Ok(parsed),
        Ok(_) => {
            debug!(reason = message, "argument shape check failed");
            Err(ToolError::invalid_request(message))
        }
        Err(e) => {
            debug!(reason = message, error = %e, "argument decoding failed");
            Err(ToolError::invalid_request(message))
        }
    }
}

/// Characters that would escape the uid's path segment.
const PATH_RESERVED: &[char] = &['/', '?', '#', '%', '\\'];

/// Check a caller-supplied environment id.
///
/// Beyond the `{owner}-{id}` shape, the id must be usable verbatim as a
/// single path segment.
pub fn validate_uid(environment_id: &str) -> Result<Uid, ToolError> {
    if environment_id.contains(PATH_RESERVED) || environment_id.chars().any(char::is_whitespace) {
        debug!("rejected environment id with reserved characters");
        return Err(ToolError::invalid_request(INVALID_UID));
    }
    Uid::parse(environment_id).map_err(|e| {
        debug!(error = %e, "rejected environment id");
        ToolError::invalid_request(INVALID_UID)
    })
}

/// Check an optional listing direction.
pub fn validate_direction(direction: Option<&str>) -> Result<Option<Direction>, ToolError> {
    direction
        .map(|d| {
            d.parse::<Direction>()
                .map_err(|_| ToolError::invalid_request(INVALID_DIRECTION))
        })
        .transpose()
}

/// Check an optional listing sort field.
pub fn validate_sort(sort: Option<&str>) -> Result<Option<SortField>, ToolError> {
    sort.map(|s| {
        s.parse::<SortField>()
            .map_err(|_| ToolError::invalid_request(INVALID_SORT))
    })
    .transpose()
}

fn all_well_formed(values: &[VariableInput]) -> bool {
    values.iter().all(VariableInput::is_well_formed)
}

/// Arguments for `list_environments`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvironmentsArgs {
    #[serde(default)]
    pub workspace: Option<String>,
}

impl ToolArgs for ListEnvironmentsArgs {}

/// Arguments for operations addressing a single environment:
/// `get_environment`, `delete_environment`, `merge_environment_fork`,
/// `pull_environment`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentIdArgs {
    pub environment_id: String,
}

impl ToolArgs for EnvironmentIdArgs {}

/// Arguments for `create_environment`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironmentArgs {
    pub workspace: String,
    pub name: String,
    pub values: Vec<VariableInput>,
}

impl ToolArgs for CreateEnvironmentArgs {
    fn is_well_formed(&self) -> bool {
        all_well_formed(&self.values)
    }
}

/// Arguments for `update_environment`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvironmentArgs {
    pub environment_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<VariableInput>>,
}

impl ToolArgs for UpdateEnvironmentArgs {
    fn is_well_formed(&self) -> bool {
        self.values.as_deref().map_or(true, all_well_formed)
    }
}

/// Arguments for `create_environment_fork`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkEnvironmentArgs {
    pub environment_id: String,
    pub workspace: String,
    #[serde(default)]
    pub fork_name: Option<String>,
}

impl ToolArgs for ForkEnvironmentArgs {
    fn is_well_formed(&self) -> bool {
        !self.workspace.is_empty()
    }
}

/// Arguments for `get_environment_forks`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEnvironmentForksArgs {
    pub environment_id: String,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub sort: Option<String>,
}

impl ToolArgs for GetEnvironmentForksArgs {}
