//! envforge - A validated client for branching environment resources
//!
//! envforge exposes environment lifecycle operations (list, get, create,
//! update, delete) and branch operations (fork, list forks, merge, pull)
//! against a remote environment service, as named tools a host can invoke
//! with a JSON argument bag.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, dispatches tools)
//! - [`tools`] - Named operations, argument validation, error classification
//! - [`transport`] - Abstraction for the remote service (HTTP and mock)
//! - [`core`] - Identifiers, variables and configuration
//!
//! # Correctness Invariants
//!
//! 1. Malformed input is rejected before any request is issued
//! 2. Every operation issues at most one request
//! 3. Every returned resource that has `owner` and `id` carries a `uid`
//! 4. Caller-facing errors carry fixed messages, never raw remote text

pub mod cli;
pub mod core;
pub mod tools;
pub mod transport;
