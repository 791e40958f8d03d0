//! JSON-RPC 2.0 wire types
//!
//! The data structures from the JSON-RPC 2.0 specification
//! (https://www.jsonrpc.org/specification) as they travel over HTTP:
//!
//! 1. **Request**: a call that expects a response, correlated by `id`
//! 2. **Notification**: a call with no `id`; the caller expects no reply
//! 3. **Response**: the result of processing a request (success or error)
//!
//! A batch is a JSON array mixing requests and notifications. All types use
//! serde directly, so the Rust shape is exactly the wire shape.

use crate::error::ErrorObject;
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON-RPC 2.0 request ID
///
/// Correlates a request with its response. The spec allows string, number,
/// or null IDs. Null is what the per-method convenience path uses when it
/// synthesizes an envelope around a bare params body.
///
/// `#[serde(untagged)]` makes the enum serialize as the bare inner value,
/// matching the wire format exactly.
///
/// # Examples
///
/// ```rust
/// use jroh_core::Id;
///
/// let a: Id = "req-7".into();
/// let b: Id = 42i64.into();
/// assert_eq!(a.to_string(), "\"req-7\"");
/// assert_eq!(b.to_string(), "42");
/// assert_eq!(Id::Null.to_string(), "null");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier, e.g. a UUID or correlation token
    String(String),
    /// Numeric identifier, e.g. a sequential counter
    Number(i64),
    /// Null identifier, used by the per-method path, where correlation
    /// is implicit (one call, one reply)
    Null,
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Number(n) => write!(f, "{}", n),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

/// JSON-RPC 2.0 request: a call that expects exactly one response
///
/// Per spec a request carries `jsonrpc: "2.0"`, a `method` name, an `id`,
/// and optionally `params` (an object with named parameters or an array
/// with positional ones).
///
/// # Examples
///
/// ```rust
/// use jroh_core::{Id, Request};
/// use serde_json::json;
///
/// let req = Request::new(
///     "translate",
///     Some(json!({"p": {"x": 1, "y": 2}, "dx": 3, "dy": 4})),
///     Id::Number(1),
/// );
/// assert_eq!(req.jsonrpc, "2.0");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Name of the registered method to invoke
    pub method: String,
    /// Parameters, omitted on the wire when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    /// Identifier echoed back in the response
    pub id: Id,
}

impl Request {
    /// Create a request with `jsonrpc` pinned to "2.0".
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>, id: Id) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC 2.0 notification: a call with no `id` and no reply
///
/// The server must not answer a notification, even when handling it fails.
/// Failures are logged server-side instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Name of the registered method to invoke
    pub method: String,
    /// Parameters, omitted on the wire when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Notification {
    /// Create a notification with `jsonrpc` pinned to "2.0".
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 response
///
/// Exactly one of `result` or `error` is present, enforced by construction
/// through [`Response::success`] and [`Response::error`]. The `id` matches
/// the originating request, or is `Id::Null` when the request id could not
/// be determined (e.g. unparsable body).
///
/// # Examples
///
/// ```rust
/// use jroh_core::{ErrorObject, Id, Response};
/// use serde_json::json;
///
/// let ok = Response::success(json!({"x": 4, "y": 6}), Id::Null);
/// assert!(ok.is_success());
///
/// let err = Response::error(ErrorObject::method_not_found(), Id::Number(2));
/// assert!(err.is_error());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Result value, present only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error object, present only on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
    /// Identifier from the originating request
    pub id: Id,
}

impl Response {
    /// Create a successful response.
    pub fn success(result: serde_json::Value, id: Id) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response.
    pub fn error(error: ErrorObject, id: Id) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// True when `result` is present.
    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    /// True when `error` is present.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Any JSON-RPC 2.0 message arriving over the wire
///
/// Incoming bodies are decoded into this enum without knowing their shape in
/// advance. Batch items stay raw `serde_json::Value`s because each element
/// is parsed (and may fail) independently: a malformed item must not poison
/// its siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// A single request expecting a response
    Request(Request),
    /// A single notification expecting none
    Notification(Notification),
    /// A response (not meaningful server-side, but part of the wire grammar)
    Response(Response),
    /// A batch of raw request/notification values
    Batch(Vec<serde_json::Value>),
}

impl Message {
    /// True for the `Request` variant.
    pub fn is_request(&self) -> bool {
        matches!(self, Message::Request(_))
    }

    /// True for the `Notification` variant.
    pub fn is_notification(&self) -> bool {
        matches!(self, Message::Notification(_))
    }

    /// True for the `Batch` variant.
    pub fn is_batch(&self) -> bool {
        matches!(self, Message::Batch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(Id::String("test".to_string()).to_string(), "\"test\"");
        assert_eq!(Id::Number(42).to_string(), "42");
        assert_eq!(Id::Null.to_string(), "null");
    }

    #[test]
    fn test_request_serialization() {
        let req = Request::new("translate", None, Id::Number(1));
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"method\":\"translate\""));
        assert!(json.contains("\"id\":1"));
        assert!(!json.contains("\"params\""));
    }

    #[test]
    fn test_notification_has_no_id() {
        let notif = Notification::new("translate", None);
        let json = serde_json::to_string(&notif).unwrap();
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_null_id_request_is_a_request_not_a_notification() {
        // The per-method path synthesizes {"id": null, ...}; that must parse
        // as a Request so a response is produced.
        let json = r#"{"jsonrpc":"2.0","method":"translate","params":{},"id":null}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        match msg {
            Message::Request(req) => assert_eq!(req.id, Id::Null),
            other => panic!("expected request, got {:?}", other),
        }
    }

    #[test]
    fn test_success_and_error_are_mutually_exclusive() {
        let ok = Response::success(serde_json::json!({"x": 4}), Id::Number(1));
        assert!(ok.is_success() && !ok.is_error());

        let err = Response::error(ErrorObject::parse_error(), Id::Null);
        assert!(err.is_error() && !err.is_success());
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("\"result\""));
    }
}
