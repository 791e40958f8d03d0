//! JSON-RPC 2.0 method registry, dispatch, and HTTP protocol adapter
//!
//! This crate turns a set of async method implementations into a mountable
//! JSON-RPC 2.0 endpoint:
//!
//! - **Registry** ([`MethodRegistry`], [`MethodEntry`]): methods registered
//!   by name with their handler, parameter schema, return schema, and
//!   documentation text
//! - **Validation** ([`schema`]): declarative parameter schemas with
//!   signature binding (positional and named params) and nested type
//!   checking
//! - **Dispatch** ([`Dispatcher`]): lookup, validate, invoke with panic
//!   containment, and classify every failure into wire fields plus an HTTP
//!   status hint
//! - **Batches** ([`BatchProcessor`]): sequential or parallel execution
//!   with per-item fault isolation and an optional size limit
//! - **Adapter** ([`RpcEndpoint`]): the transport-facing surface (raw body
//!   in, [`HttpReply`] out) with an [`AuthGuard`] gate in front
//!
//! # Quick start
//!
//! ```rust
//! use jroh_server::schema::{Param, ParamsSchema, Schema};
//! use jroh_server::{from_typed_fn, EndpointBuilder, MethodEntry};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize)]
//! struct Args { a: i64, b: i64 }
//!
//! #[derive(Serialize)]
//! struct Sum { total: i64 }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let endpoint = EndpointBuilder::new()
//!     .register(
//!         MethodEntry::new(
//!             "add",
//!             from_typed_fn(|args: Args| async move {
//!                 Ok(Sum { total: args.a + args.b })
//!             }),
//!         )
//!         .params(ParamsSchema::new(vec![
//!             Param::required("a", Schema::Integer),
//!             Param::required("b", Schema::Integer),
//!         ])),
//!     )
//!     .build();
//!
//! // Generic path: full envelope, HTTP status always 200.
//! let reply = endpoint
//!     .handle(r#"{"jsonrpc":"2.0","method":"add","params":{"a":2,"b":3},"id":1}"#, None)
//!     .await;
//! assert!(reply.body.contains(r#""total":5"#));
//!
//! // Per-method path: bare params, status reflects the outcome.
//! let reply = endpoint.handle(r#"{"a": 2, "b": 3}"#, Some("add")).await;
//! assert_eq!(reply.status, 200);
//! # }
//! ```

pub mod auth;
pub mod batch;
pub mod builder;
pub mod dispatch;
pub mod docs;
pub mod endpoint;
pub mod handler;
pub mod registry;
pub mod schema;

pub use auth::{AllowAll, AuthGuard};
pub use batch::{BatchMode, BatchProcessor};
pub use builder::EndpointBuilder;
pub use dispatch::{classify, Dispatched, Dispatcher, Outcome};
pub use docs::{describe, spec_document, MethodDoc};
pub use endpoint::{HttpReply, RpcEndpoint};
pub use handler::{from_fn, from_typed_fn, AsyncHandler, Handler, HandlerResult};
pub use registry::{MethodEntry, MethodRegistry};
pub use schema::{Field, ObjectSchema, Param, ParamsSchema, Schema};
