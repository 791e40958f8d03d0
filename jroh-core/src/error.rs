//! Error taxonomy for jroh
//!
//! Three layers cooperate here:
//!
//! - [`Error`]: the internal error type every stage of the pipeline
//!   (parsing, lookup, validation, invocation) produces. Nothing above the
//!   dispatch boundary ever sees it raw; the classifier in `jroh-server`
//!   converts each variant into wire fields plus an HTTP status hint.
//! - [`ErrorObject`]: the JSON-RPC 2.0 `error` member exactly as it
//!   appears on the wire: `code`, `message`, optional `data`.
//! - [`ApplicationError`]: a domain error a handler raises deliberately,
//!   with caller-controlled code, message, data, and HTTP status. The HTTP
//!   status is a first-class field here rather than smuggled through the
//!   `data` payload, so no side channel is needed between the dispatcher
//!   and the transport adapter.
//!
//! # Standard error codes
//!
//! JSON-RPC 2.0 reserves:
//! - `-32700`: Parse error (invalid JSON)
//! - `-32600`: Invalid Request (malformed envelope)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000..=-32099`: implementation-defined server errors; jroh uses
//!   `-32000` for unhandled faults with a redacted message

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type used throughout the jroh crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error for everything that can go wrong while handling a call
///
/// The variants map one-to-one onto the classification table: the dispatch
/// engine recovers every variant and turns it into a per-call outcome, so no
/// error ever escapes to the transport uncaught.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Domain error raised deliberately by a handler, passed through
    /// unchanged (code, message, data, HTTP status).
    #[error("application error: {0}")]
    Application(#[from] ApplicationError),

    /// Explicit JSON-RPC-shaped error raised by a handler without an HTTP
    /// status override. Classified with a default status of 500.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] ErrorObject),

    /// Argument validation or signature binding failed before the handler
    /// ran. `data` carries the field-path error mapping when the failure
    /// came from schema validation; binding failures carry none.
    #[error("invalid params: {message}")]
    InvalidParams {
        /// One-line rendering of the underlying failure
        message: String,
        /// Nested field-path error mapping, when available
        data: Option<Value>,
    },

    /// The request body was not valid JSON.
    #[error("Parse error")]
    Parse,

    /// The body was valid JSON but not a valid JSON-RPC envelope.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No method registered under the requested name.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Unexpected failure inside a handler or the framework. The detail is
    /// logged server-side and never reaches the client.
    #[error("internal error: {0}")]
    Internal(String),

    /// A value could not be converted to or from JSON.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// JSON-RPC 2.0 error object: the exact wire shape
///
/// Appears in the `error` member of a [`Response`](crate::Response). A
/// handler may also raise one directly (via [`Error::Dispatch`]) to control
/// the wire code/message/data without touching the HTTP status.
///
/// # Examples
///
/// ```rust
/// use jroh_core::ErrorObject;
/// use serde_json::json;
///
/// let not_found = ErrorObject::method_not_found();
/// assert_eq!(not_found.code, -32601);
///
/// let custom = ErrorObject::with_data(45678, "out of stock", json!({"sku": "A1"}));
/// assert!(custom.data.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Numeric error code; `-32768..=-32000` is reserved by the spec
    pub code: i32,
    /// Short human-readable description
    pub message: String,
    /// Optional structured context, e.g. a validation error mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    /// Create an error object with code and message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error object carrying structured `data`.
    pub fn with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Parse error (-32700): the body was not valid JSON.
    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error")
    }

    /// Invalid request (-32600): valid JSON, malformed envelope.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(-32600, msg)
    }

    /// Method not found (-32601). The message is exactly "Method not
    /// found"; the requested name is logged, not echoed.
    pub fn method_not_found() -> Self {
        Self::new(-32601, "Method not found")
    }

    /// Invalid params (-32602).
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(-32602, msg)
    }

    /// Internal error (-32603).
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(-32603, msg)
    }

    /// Unhandled fault (-32000) with the redacted client-visible message.
    /// The underlying failure is logged server-side with full detail.
    pub fn unhandled(method: &str) -> Self {
        Self::new(-32000, format!("Unhandled error in method {}", method))
    }

    /// Batch size guard (-32600), rejecting oversized batches outright.
    pub fn batch_size_exceeded(limit: usize, actual: usize) -> Self {
        Self::new(
            -32600,
            format!("Batch size limit exceeded: limit={}, actual={}", limit, actual),
        )
    }
}

impl std::fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorObject {}

/// Domain error with caller-controlled wire fields and HTTP status
///
/// The one error type handlers raise on purpose. Everything is explicit:
/// the JSON-RPC code, the message, optional structured data, and the HTTP
/// status the per-method path should answer with (500 unless overridden).
///
/// # Examples
///
/// ```rust
/// use jroh_core::ApplicationError;
/// use serde_json::json;
///
/// let err = ApplicationError::new(12345, "quota exhausted")
///     .with_data(json!({"limit": 100}))
///     .with_http_status(401);
/// assert_eq!(err.http_status, 401);
/// ```
#[derive(Debug, Clone, Error)]
#[error("{message} (code {code})")]
pub struct ApplicationError {
    /// Application-chosen JSON-RPC error code
    pub code: i32,
    /// Client-visible message
    pub message: String,
    /// Optional structured context
    pub data: Option<Value>,
    /// HTTP status for the per-method path; the generic path ignores it
    pub http_status: u16,
}

impl ApplicationError {
    /// Create a domain error with the default HTTP status of 500.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            http_status: 500,
        }
    }

    /// Attach structured `data`.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Override the HTTP status hint.
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = status;
        self
    }
}

impl From<ApplicationError> for ErrorObject {
    fn from(err: ApplicationError) -> Self {
        Self {
            code: err.code,
            message: err.message,
            data: err.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_standard_error_codes() {
        assert_eq!(ErrorObject::parse_error().code, -32700);
        assert_eq!(ErrorObject::invalid_request("x").code, -32600);
        assert_eq!(ErrorObject::method_not_found().code, -32601);
        assert_eq!(ErrorObject::invalid_params("x").code, -32602);
        assert_eq!(ErrorObject::internal_error("x").code, -32603);
        assert_eq!(ErrorObject::unhandled("m").code, -32000);
    }

    #[test]
    fn test_method_not_found_message_is_bare() {
        // The method name is deliberately not echoed in the message.
        assert_eq!(ErrorObject::method_not_found().message, "Method not found");
    }

    #[test]
    fn test_unhandled_message_names_the_method() {
        assert_eq!(
            ErrorObject::unhandled("translate").message,
            "Unhandled error in method translate"
        );
    }

    #[test]
    fn test_error_object_skips_absent_data() {
        let json = serde_json::to_string(&ErrorObject::parse_error()).unwrap();
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_error_object_round_trip_with_data() {
        let obj = ErrorObject::with_data(-32602, "bad", json!({"p": ["nope"]}));
        let decoded: ErrorObject =
            serde_json::from_str(&serde_json::to_string(&obj).unwrap()).unwrap();
        assert_eq!(decoded, obj);
    }

    #[test]
    fn test_application_error_defaults() {
        let err = ApplicationError::new(12345, "boom");
        assert_eq!(err.http_status, 500);
        assert!(err.data.is_none());
    }

    #[test]
    fn test_application_error_builders() {
        let err = ApplicationError::new(12345, "boom")
            .with_data(json!({"foo": 123}))
            .with_http_status(401);
        assert_eq!(err.http_status, 401);
        let obj: ErrorObject = err.into();
        assert_eq!(obj.code, 12345);
        assert_eq!(obj.data, Some(json!({"foo": 123})));
    }

    #[test]
    fn test_batch_size_exceeded_mentions_both_sizes() {
        let err = ErrorObject::batch_size_exceeded(10, 15);
        assert_eq!(err.code, -32600);
        assert!(err.message.contains("10") && err.message.contains("15"));
    }
}
