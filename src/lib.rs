//! jroh - JSON-RPC 2.0 over HTTP
//!
//! Convenience crate re-exporting the jroh sub-crates. Depend on this crate
//! for a single import that provides the wire types, the method registry,
//! dispatch, and the transport-facing endpoint.
//!
//! - [`core`]: JSON-RPC 2.0 wire types, codec, and the error taxonomy
//! - [`server`]: method registry, argument validation, dispatch engine,
//!   batch processing, and the HTTP protocol adapter
//!
//! # Example
//!
//! ```rust
//! use jroh::server::schema::{Param, ParamsSchema, Schema};
//! use jroh::server::{from_typed_fn, EndpointBuilder, MethodEntry};
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
//! let reply = endpoint.handle(r#"{"a": 2, "b": 3}"#, Some("add")).await;
//! assert_eq!(reply.status, 200);
//! # }
//! ```

pub use jroh_core as core;
pub use jroh_server as server;

// The types most hosts touch directly.
pub use jroh_core::{ApplicationError, Error, ErrorObject, Id, Request, Response, Result};
pub use jroh_server::{
    AuthGuard, BatchMode, EndpointBuilder, HttpReply, MethodEntry, RpcEndpoint,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reexports_compose() {
        let endpoint = EndpointBuilder::new()
            .register(MethodEntry::new(
                "ping",
                server::from_fn(|_| async move { Ok(serde_json::json!("pong")) }),
            ))
            .build();

        let reply = endpoint
            .handle(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#, None)
            .await;
        assert_eq!(reply.status, 200);
        assert!(reply.body.contains("pong"));
    }
}
