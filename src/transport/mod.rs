//! transport
//!
//! Abstraction over the HTTP client that reaches the remote service.
//!
//! # Architecture
//!
//! The [`Transport`] trait is the only way operations talk to the network.
//! Operations receive an `Arc<dyn Transport>` and never know which
//! implementation they are using.
//!
//! # Modules
//!
//! - `traits`: Core `Transport` trait and request/response types
//! - [`http`]: `reqwest` implementation
//! - [`mock`]: In-memory simulation for deterministic testing

pub mod http;
pub mod mock;
mod traits;

pub use traits::*;
