//! Protocol adapter: the transport-facing surface
//!
//! [`RpcEndpoint`] is what an HTTP layer mounts. It takes a raw body (plus
//! an optional method name from the URL path) and returns an [`HttpReply`]
//! with status, body, and content type already decided. No HTTP framework
//! types appear here, so any transport can host it.
//!
//! Two paths:
//!
//! - **Generic** (`POST {base}/`): the body is a full JSON-RPC envelope or
//!   batch. Per the JSON-RPC convention the HTTP status is always 200; the
//!   real outcome lives in the envelope.
//! - **Per-method** (`POST {base}/{method}`): the body is just the params
//!   value. An envelope is synthesized with the method from the URL and a
//!   null id, and the HTTP status reflects the classified outcome (400 for
//!   caller errors, 500 for faults, or whatever an application error
//!   requested).
//!
//! The auth gate runs before anything else; a rejected caller gets a
//! plain-text 403 with no envelope.

use crate::auth::AuthGuard;
use crate::dispatch::{Dispatched, Dispatcher, Outcome};
use crate::registry::MethodRegistry;
use jroh_core::{codec, Error, Id, Request, Response};
use std::sync::Arc;

/// A transport-agnostic HTTP reply
///
/// The adapter decides everything; the hosting layer only copies these
/// fields into its own response type.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    /// HTTP status code
    pub status: u16,
    /// Response body, possibly empty
    pub body: String,
    /// Content type of the body
    pub content_type: &'static str,
}

impl HttpReply {
    /// A JSON body.
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            body,
            content_type: "application/json",
        }
    }

    /// A plain-text body.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "text/plain",
        }
    }

    /// An empty 200: the reply to notifications.
    pub fn empty() -> Self {
        Self {
            status: 200,
            body: String::new(),
            content_type: "application/json",
        }
    }
}

/// The mountable JSON-RPC endpoint
///
/// Built through [`EndpointBuilder`](crate::EndpointBuilder). Cheap to
/// clone behind an `Arc`; one instance serves all requests.
///
/// # Examples
///
/// ```rust
/// use jroh_server::{from_fn, EndpointBuilder, MethodEntry};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let endpoint = EndpointBuilder::new()
///     .register(MethodEntry::new(
///         "ping",
///         from_fn(|_| async move { Ok(serde_json::json!("pong")) }),
///     ))
///     .build();
///
/// let reply = endpoint
///     .handle(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#, None)
///     .await;
/// assert_eq!(reply.status, 200);
/// # }
/// ```
pub struct RpcEndpoint {
    registry: Arc<MethodRegistry>,
    dispatcher: Dispatcher,
    auth: Arc<dyn AuthGuard>,
}

impl RpcEndpoint {
    pub(crate) fn new(
        registry: Arc<MethodRegistry>,
        dispatcher: Dispatcher,
        auth: Arc<dyn AuthGuard>,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            auth,
        }
    }

    /// The registry backing this endpoint, for documentation output.
    pub fn registry(&self) -> &Arc<MethodRegistry> {
        &self.registry
    }

    /// Handle one POST body.
    ///
    /// `method_hint` is the method name taken from the URL on the
    /// per-method path, or `None` on the generic path.
    pub async fn handle(&self, body: &str, method_hint: Option<&str>) -> HttpReply {
        if !self.auth.is_authenticated().await {
            tracing::debug!("request rejected by auth guard");
            return HttpReply::text(403, "Forbidden");
        }

        match method_hint {
            Some(method) => self.handle_method_path(body, method).await,
            None => self.handle_generic(body).await,
        }
    }

    /// Per-method path: the body is the params value, the URL names the
    /// method, and the HTTP status follows the classified outcome.
    async fn handle_method_path(&self, body: &str, method: &str) -> HttpReply {
        let params = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value,
            Err(_) => {
                let outcome = failure_for(method, Error::Parse);
                let status = outcome.http_status();
                return self.reply_with(status, outcome.into_response());
            }
        };

        let request = Request::new(method, Some(params), Id::Null);
        let outcome = self.dispatcher.call(request).await;
        let status = outcome.http_status();
        self.reply_with(status, outcome.into_response())
    }

    /// Generic path: full envelope in the body, HTTP status always 200.
    async fn handle_generic(&self, body: &str) -> HttpReply {
        let message = match codec::decode(body) {
            Ok(message) => message,
            Err(err) => {
                let outcome = failure_for("", err);
                return self.reply_with(200, outcome.into_response());
            }
        };

        match self.dispatcher.dispatch(message).await {
            Dispatched::None => HttpReply::empty(),
            Dispatched::Single(outcome) => self.reply_with(200, outcome.into_response()),
            Dispatched::Batch(outcomes) => {
                if outcomes.is_empty() {
                    return HttpReply::empty();
                }
                let responses: Vec<Response> =
                    outcomes.into_iter().map(Outcome::into_response).collect();
                match codec::encode_batch(&responses) {
                    Ok(body) => HttpReply::json(200, body),
                    Err(err) => encode_failure(err),
                }
            }
        }
    }

    fn reply_with(&self, status: u16, response: Response) -> HttpReply {
        match codec::encode(&response) {
            Ok(body) => HttpReply::json(status, body),
            Err(err) => encode_failure(err),
        }
    }
}

/// Classify an error that occurred before dispatch could run.
fn failure_for(method: &str, err: Error) -> Outcome {
    let (error, http_status) = crate::dispatch::classify(method, err);
    Outcome::Failure {
        id: Id::Null,
        error,
        http_status,
    }
}

/// Last-resort reply when a response cannot be serialized.
fn encode_failure(err: Error) -> HttpReply {
    tracing::error!(error = %err, "failed to encode response");
    HttpReply::text(500, "Internal Server Error")
}
