//! core::uid
//!
//! Composite resource identifiers.
//!
//! # Format
//!
//! A uid addresses a resource inside its owner scope:
//!
//! ```text
//! {ownerId}-{resourceId}
//! ```
//!
//! The owner id never contains the separator; the resource id may (UUIDs do),
//! so decoding splits on the *first* separator only.
//!
//! # Example
//!
//! ```
//! use envforge::core::uid::{construct_uid, is_valid_uid, Uid};
//!
//! let uid = construct_uid("31912785", "b8cdb26a-0c58-4f35-9775-4945c39d7ee2");
//! assert!(is_valid_uid(&uid));
//!
//! let parsed = Uid::parse(&uid).unwrap();
//! assert_eq!(parsed.owner(), "31912785");
//! assert_eq!(parsed.id(), "b8cdb26a-0c58-4f35-9775-4945c39d7ee2");
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Separator between the owner half and the resource half.
pub const SEPARATOR: char = '-';

/// Errors from uid parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UidError {
    #[error("uid is missing the '-' separator: {0}")]
    MissingSeparator(String),

    #[error("uid has an empty owner part: {0}")]
    EmptyOwner(String),

    #[error("uid has an empty resource part: {0}")]
    EmptyResource(String),
}

/// Check whether `s` is a well-formed `{ownerId}-{resourceId}` string.
///
/// True iff `s` contains the separator and the text on both sides of the
/// first separator is non-empty. Never touches the network.
pub fn is_valid_uid(s: &str) -> bool {
    Uid::parse(s).is_ok()
}

/// Join an owner id and a resource id into a uid.
///
/// No validation is performed; inputs are expected to come from a trusted
/// source such as a response body.
pub fn construct_uid(owner: &str, id: &str) -> String {
    format!("{}{}{}", owner, SEPARATOR, id)
}

/// A validated composite identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uid {
    raw: String,
    split: usize,
}

impl Uid {
    /// Parse and validate a uid string.
    pub fn parse(s: &str) -> Result<Self, UidError> {
        let split = s
            .find(SEPARATOR)
            .ok_or_else(|| UidError::MissingSeparator(s.to_string()))?;

        if split == 0 {
            return Err(UidError::EmptyOwner(s.to_string()));
        }
        if split + SEPARATOR.len_utf8() == s.len() {
            return Err(UidError::EmptyResource(s.to_string()));
        }

        Ok(Self {
            raw: s.to_string(),
            split,
        })
    }

    /// Build a uid from its parts.
    pub fn from_parts(owner: &str, id: &str) -> Result<Self, UidError> {
        Self::parse(&construct_uid(owner, id))
    }

    /// The owner-scope half.
    pub fn owner(&self) -> &str {
        &self.raw[..self.split]
    }

    /// The scope-local resource half.
    pub fn id(&self) -> &str {
        &self.raw[self.split + SEPARATOR.len_utf8()..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Uid {
    type Err = UidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

/// Add a derived `uid` field to a resource object.
///
/// The uid is computed from the object's `owner` and `id` fields. Owner ids
/// are accepted as JSON strings or numbers. Objects lacking either field are
/// returned unchanged.
pub fn backfill_uid(mut resource: Value) -> Value {
    let uid = match (
        resource.get("owner").and_then(scalar_text),
        resource.get("id").and_then(scalar_text),
    ) {
        (Some(owner), Some(id)) => construct_uid(&owner, &id),
        _ => {
            warn!("resource body lacks owner/id; uid not back-filled");
            return resource;
        }
    };

    if let Value::Object(map) = &mut resource {
        map.insert("uid".to_string(), Value::String(uid));
    }
    resource
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
