//! Core JSON-RPC 2.0 types, codec, and error taxonomy for jroh
//!
//! This crate is the transport-agnostic foundation of jroh:
//!
//! - **Types**: the JSON-RPC 2.0 wire structures (requests, notifications,
//!   responses, batches)
//! - **Codec**: body decoding with parse/shape distinction and batch
//!   detection, plus response encoding
//! - **Errors**: the internal [`Error`] taxonomy the dispatch pipeline
//!   classifies, the wire-shaped [`ErrorObject`], and the
//!   handler-raised [`ApplicationError`] with its first-class HTTP status
//! - **Logging**: a `tracing-subscriber` pipeline for hosts without one
//!
//! The `jroh-server` crate builds the method registry, argument validation,
//! dispatch engine, and HTTP protocol adapter on top of this foundation.
//!
//! # Example
//!
//! ```rust
//! use jroh_core::{codec, Id, Request};
//!
//! let request = Request::new(
//!     "translate",
//!     Some(serde_json::json!({"p": {"x": 1, "y": 2}, "dx": 3, "dy": 4})),
//!     Id::Number(1),
//! );
//! let body = codec::encode(&request).unwrap();
//! assert!(codec::decode(&body).unwrap().is_request());
//! ```

pub mod codec;
pub mod error;
pub mod logging;
pub mod types;

// Re-export the common types so callers can write `jroh_core::Error`
// instead of `jroh_core::error::Error`.
pub use error::{ApplicationError, Error, ErrorObject, Result};
pub use logging::{init_logging, LogConfig};
pub use types::{Id, Message, Notification, Request, Response};
