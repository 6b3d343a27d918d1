//! core
//!
//! Domain types and configuration for envforge.
//!
//! # Modules
//!
//! - [`uid`] - Composite `{owner}-{id}` identifiers and uid back-fill
//! - [`types`] - Variables and fork listing parameters
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing keeps malformed identifiers out of request paths
//! - Schemas are strict and self-describing

pub mod config;
pub mod types;
pub mod uid;
