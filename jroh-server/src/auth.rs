//! Authentication gate
//!
//! The endpoint consults an [`AuthGuard`] before any request body is
//! parsed. A rejected caller gets a plain-text 403, never a JSON-RPC
//! envelope, so an unauthenticated probe learns nothing about the protocol
//! surface behind the gate.
//!
//! The trait is deliberately minimal: the transport layer is expected to
//! capture whatever request context it needs (headers, tokens, session)
//! into the guard before handing the body to the endpoint.

use async_trait::async_trait;

/// Decides whether the current caller may use the endpoint
#[async_trait]
pub trait AuthGuard: Send + Sync {
    /// True when the caller is allowed through.
    async fn is_authenticated(&self) -> bool;
}

/// Guard that admits everyone; the default when none is configured.
pub struct AllowAll;

#[async_trait]
impl AuthGuard for AllowAll {
    async fn is_authenticated(&self) -> bool {
        true
    }
}
