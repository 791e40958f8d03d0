//! Endpoint builder
//!
//! Collects method registrations and configuration, then produces an
//! immutable [`RpcEndpoint`]. All mutation happens here; after `build` the
//! registry is shared read-only and dispatch needs no locking.

use crate::auth::{AllowAll, AuthGuard};
use crate::batch::{BatchMode, BatchProcessor};
use crate::dispatch::Dispatcher;
use crate::endpoint::RpcEndpoint;
use crate::registry::{MethodEntry, MethodRegistry};
use std::sync::Arc;

/// Builder for [`RpcEndpoint`]
///
/// # Examples
///
/// ```rust
/// use jroh_server::{from_fn, BatchMode, EndpointBuilder, MethodEntry};
///
/// let endpoint = EndpointBuilder::new()
///     .register(MethodEntry::new(
///         "ping",
///         from_fn(|_| async move { Ok(serde_json::json!("pong")) }),
///     ))
///     .batch_mode(BatchMode::Parallel)
///     .max_batch_size(64)
///     .build();
/// assert!(endpoint.registry().has_method("ping"));
/// ```
pub struct EndpointBuilder {
    registry: MethodRegistry,
    auth: Arc<dyn AuthGuard>,
    batch_mode: BatchMode,
    max_batch_size: Option<usize>,
}

impl Default for EndpointBuilder {
    fn default() -> Self {
        Self {
            registry: MethodRegistry::new(),
            auth: Arc::new(AllowAll),
            batch_mode: BatchMode::Sequential,
            max_batch_size: None,
        }
    }
}

impl EndpointBuilder {
    /// Start an empty builder: no methods, no auth gate, sequential
    /// batches with no size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method. Registering the same name twice keeps the later
    /// entry.
    pub fn register(mut self, entry: MethodEntry) -> Self {
        self.registry.register(entry);
        self
    }

    /// Install an authentication gate.
    pub fn auth(mut self, guard: Arc<dyn AuthGuard>) -> Self {
        self.auth = guard;
        self
    }

    /// Choose how batch items execute.
    pub fn batch_mode(mut self, mode: BatchMode) -> Self {
        self.batch_mode = mode;
        self
    }

    /// Reject batches larger than `limit` outright.
    pub fn max_batch_size(mut self, limit: usize) -> Self {
        self.max_batch_size = Some(limit);
        self
    }

    /// Produce the endpoint.
    pub fn build(self) -> RpcEndpoint {
        let batch = match self.max_batch_size {
            Some(limit) => BatchProcessor::with_limit(self.batch_mode, limit),
            None => BatchProcessor::new(self.batch_mode),
        };
        let registry = Arc::new(self.registry);
        let dispatcher = Dispatcher::new(Arc::clone(&registry), batch);
        tracing::info!(methods = registry.len(), "endpoint built");
        RpcEndpoint::new(registry, dispatcher, self.auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::from_fn;
    use serde_json::json;

    #[tokio::test]
    async fn test_built_endpoint_serves_registered_methods() {
        let endpoint = EndpointBuilder::new()
            .register(MethodEntry::new(
                "ping",
                from_fn(|_| async move { Ok(json!("pong")) }),
            ))
            .build();

        let reply = endpoint
            .handle(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#, None)
            .await;
        assert!(reply.body.contains("\"pong\""));
    }

    #[test]
    fn test_duplicate_registration_keeps_the_later_entry() {
        let endpoint = EndpointBuilder::new()
            .register(MethodEntry::new(
                "m",
                from_fn(|_| async move { Ok(json!(1)) }),
            ))
            .register(MethodEntry::new(
                "m",
                from_fn(|_| async move { Ok(json!(2)) }),
            ))
            .build();

        assert_eq!(endpoint.registry().len(), 1);
    }
}
