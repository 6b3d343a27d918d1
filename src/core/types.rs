//! core::types
//!
//! Domain types for environment payloads and fork pagination.
//!
//! # Types
//!
//! - [`VariableInput`] - A variable as supplied by a caller (optional fields)
//! - [`Variable`] - A fully-populated variable as sent on the wire
//! - [`VariableType`] - `default` or `secret`
//! - [`Direction`] - Fork listing order
//! - [`SortField`] - Fork listing sort key
//!
//! # Normalization
//!
//! Outgoing variables always carry all four fields. A missing `type` becomes
//! `default`; `enabled` is `true` unless the caller sent the literal `false`.
//!
//! ```
//! use envforge::core::types::{Variable, VariableInput, VariableType};
//!
//! let input: VariableInput = serde_json::from_str(r#"{"key":"a","value":"1"}"#).unwrap();
//! let var = Variable::from(input);
//! assert_eq!(var.var_type, VariableType::Default);
//! assert!(var.enabled);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from parsing listing parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    #[error("invalid sort field: {0}")]
    InvalidSort(String),
}

/// Variable kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// Plain value
    #[default]
    Default,
    /// Value masked by the remote UI
    Secret,
}

/// A variable as supplied in caller arguments.
///
/// `enabled` is kept as raw JSON so that only the literal `false` disables a
/// variable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariableInput {
    pub key: String,
    pub value: String,
    #[serde(default, rename = "type")]
    pub var_type: Option<VariableType>,
    #[serde(default)]
    pub enabled: Option<Value>,
}

impl VariableInput {
    /// Shape check beyond what deserialization enforces.
    pub fn is_well_formed(&self) -> bool {
        !self.key.is_empty()
    }
}

/// A normalized variable, every field populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub enabled: bool,
}

impl From<VariableInput> for Variable {
    fn from(input: VariableInput) -> Self {
        let enabled = !matches!(input.enabled, Some(Value::Bool(false)));
        Variable {
            key: input.key,
            value: input.value,
            var_type: input.var_type.unwrap_or_default(),
            enabled,
        }
    }
}

/// Normalize a caller-supplied variable list.
pub fn normalize_variables(values: Vec<VariableInput>) -> Vec<Variable> {
    values.into_iter().map(Variable::from).collect()
}

/// Fork listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(TypeError::InvalidDirection(other.to_string())),
        }
    }
}

/// Fork listing sort key. Only creation time is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            other => Err(TypeError::InvalidSort(other.to_string())),
        }
    }
}
