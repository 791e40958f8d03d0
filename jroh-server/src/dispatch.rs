//! Dispatch engine: lookup, validate, invoke, classify
//!
//! One decoded message goes in; zero or more [`Outcome`]s come out. The
//! pipeline for a single call is:
//!
//! 1. Look up the method in the registry
//! 2. Validate and bind the raw params against the declared schema
//! 3. Invoke the handler, containing panics
//! 4. Check the result against the declared return schema
//! 5. On any failure, classify the error into wire fields plus an HTTP
//!    status hint
//!
//! Every error is recovered here. Nothing escapes to the transport as a
//! Rust error: the worst case is an unhandled-fault outcome with a
//! redacted message, logged server-side with full detail.

use crate::batch::BatchProcessor;
use crate::registry::MethodRegistry;
use futures::FutureExt;
use jroh_core::{Error, ErrorObject, Id, Message, Notification, Request, Response};
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// The fate of one call: a result or a classified error
///
/// Both variants carry everything the transport adapter needs: the wire
/// fields and the HTTP status the per-method path should answer with. The
/// generic path ignores the status and always answers 200.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The handler produced a result.
    Success {
        /// Identifier from the originating request
        id: Id,
        /// The handler's return value
        result: Value,
    },
    /// The call failed somewhere in the pipeline.
    Failure {
        /// Identifier from the originating request, `Id::Null` when unknown
        id: Id,
        /// Classified wire error
        error: ErrorObject,
        /// HTTP status hint for the per-method path
        http_status: u16,
    },
}

impl Outcome {
    /// HTTP status hint: 200 on success, the classified status on failure.
    pub fn http_status(&self) -> u16 {
        match self {
            Outcome::Success { .. } => 200,
            Outcome::Failure { http_status, .. } => *http_status,
        }
    }

    /// The request identifier this outcome answers.
    pub fn id(&self) -> &Id {
        match self {
            Outcome::Success { id, .. } | Outcome::Failure { id, .. } => id,
        }
    }

    /// True for the `Success` variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Convert into the wire response.
    pub fn into_response(self) -> Response {
        match self {
            Outcome::Success { id, result } => Response::success(result, id),
            Outcome::Failure { id, error, .. } => Response::error(error, id),
        }
    }
}

/// What dispatching a message produced
#[derive(Debug)]
pub enum Dispatched {
    /// Nothing to send back (a notification, or an all-notification batch)
    None,
    /// One response
    Single(Outcome),
    /// One response per non-notification batch item, in input order
    Batch(Vec<Outcome>),
}

/// Turn an internal error into wire fields plus an HTTP status hint
///
/// The precedence is fixed: deliberate errors (application, dispatch) pass
/// through with their own fields; protocol-level failures map to the
/// standard codes with status 400; everything unexpected becomes an
/// unhandled fault (-32000, status 500) whose client-visible message names
/// only the method. The underlying detail is logged, never sent.
pub fn classify(method: &str, err: Error) -> (ErrorObject, u16) {
    match err {
        Error::Application(app) => {
            let status = app.http_status;
            (app.into(), status)
        }
        Error::Dispatch(obj) => (obj, 500),
        Error::InvalidParams { message, data } => {
            let mut obj = ErrorObject::invalid_params(message);
            obj.data = data;
            (obj, 400)
        }
        Error::Parse => (ErrorObject::parse_error(), 400),
        Error::InvalidRequest(msg) => (ErrorObject::invalid_request(msg), 400),
        Error::MethodNotFound(name) => {
            tracing::debug!(method = %name, "method not found");
            (ErrorObject::method_not_found(), 400)
        }
        Error::Internal(detail) | Error::Serialization(detail) => {
            tracing::error!(method = %method, %detail, "unhandled error in method");
            (ErrorObject::unhandled(method), 500)
        }
    }
}

/// The dispatch engine
///
/// Clones share the registry; cloning is cheap and lets the batch
/// processor move a dispatcher into spawned tasks.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<MethodRegistry>,
    batch: BatchProcessor,
}

impl Dispatcher {
    /// Create a dispatcher over a shared registry.
    pub fn new(registry: Arc<MethodRegistry>, batch: BatchProcessor) -> Self {
        Self { registry, batch }
    }

    /// The registry this dispatcher consults.
    pub fn registry(&self) -> &Arc<MethodRegistry> {
        &self.registry
    }

    /// Dispatch one decoded message.
    ///
    /// Requests produce a single outcome; notifications produce none (their
    /// failures are logged); batches produce one outcome per contained
    /// request. A response object arriving where a request belongs is a
    /// protocol violation and is answered as an invalid request.
    pub async fn dispatch(&self, message: Message) -> Dispatched {
        match message {
            Message::Request(req) => Dispatched::Single(self.call(req).await),
            Message::Notification(notif) => {
                self.notify(notif).await;
                Dispatched::None
            }
            Message::Response(_) => Dispatched::Single(Outcome::Failure {
                id: Id::Null,
                error: ErrorObject::invalid_request("unexpected response object"),
                http_status: 400,
            }),
            Message::Batch(items) => Dispatched::Batch(self.batch.process(items, self).await),
        }
    }

    /// Execute one request and classify any failure.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, id = %request.id))]
    pub async fn call(&self, request: Request) -> Outcome {
        let Request {
            method, params, id, ..
        } = request;

        match self.run_call(&method, params).await {
            Ok(result) => Outcome::Success { id, result },
            Err(err) => {
                let (error, http_status) = classify(&method, err);
                Outcome::Failure {
                    id,
                    error,
                    http_status,
                }
            }
        }
    }

    /// Execute a notification; the outcome is discarded, failures logged.
    pub async fn notify(&self, notification: Notification) {
        if let Err(err) = self
            .run_call(&notification.method, notification.params)
            .await
        {
            tracing::warn!(method = %notification.method, error = %err, "notification failed");
        }
    }

    /// Lookup, validate, invoke, and check the return value.
    async fn run_call(&self, method: &str, params: Option<Value>) -> Result<Value, Error> {
        let entry = self
            .registry
            .lookup(method)
            .ok_or_else(|| Error::MethodNotFound(method.to_string()))?;

        let bound = entry.params_schema().validate(params.as_ref())?;

        let fut = entry.handler().handle(Some(Value::Object(bound)));
        // Handlers are arbitrary user code; a panic must become a per-call
        // fault, not take the connection down.
        let result = match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(result) => result?,
            Err(payload) => {
                return Err(Error::Internal(format!(
                    "handler panicked: {}",
                    panic_message(payload.as_ref())
                )));
            }
        };

        if let Err(mapping) = entry.return_schema().check(&result) {
            return Err(Error::Internal(format!(
                "return value failed schema check: {}",
                mapping
            )));
        }

        Ok(result)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchProcessor;
    use crate::handler::{from_fn, from_typed_fn};
    use crate::registry::MethodEntry;
    use crate::schema::{Param, ParamsSchema, Schema};
    use jroh_core::ApplicationError;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Deserialize)]
    struct AddArgs {
        a: i64,
        b: i64,
    }

    #[derive(Serialize)]
    struct Sum {
        total: i64,
    }

    fn dispatcher() -> Dispatcher {
        let mut registry = MethodRegistry::new();

        registry.register(
            MethodEntry::new(
                "add",
                from_typed_fn(|args: AddArgs| async move {
                    Ok(Sum {
                        total: args.a + args.b,
                    })
                }),
            )
            .params(ParamsSchema::new(vec![
                Param::required("a", Schema::Integer),
                Param::required("b", Schema::Integer),
            ])),
        );

        registry.register(
            MethodEntry::new(
                "fail",
                from_fn(|_| async move {
                    Err::<Value, Error>(Error::Internal("database on fire".to_string()))
                }),
            ),
        );

        registry.register(MethodEntry::new(
            "panic",
            from_fn(|_| async move {
                panic!("boom");
                #[allow(unreachable_code)]
                Ok(Value::Null)
            }),
        ));

        registry.register(
            MethodEntry::new(
                "bad_shape",
                from_fn(|_| async move { Ok(json!("not an integer")) }),
            )
            .returns(Schema::Integer),
        );

        registry.register(MethodEntry::new(
            "refuse",
            from_fn(|_| async move {
                Err::<Value, Error>(
                    ApplicationError::new(12345, "quota exhausted")
                        .with_http_status(401)
                        .into(),
                )
            }),
        ));

        Dispatcher::new(Arc::new(registry), BatchProcessor::default())
    }

    #[tokio::test]
    async fn test_successful_call() {
        let outcome = dispatcher()
            .call(Request::new(
                "add",
                Some(json!({"a": 2, "b": 3})),
                Id::Number(1),
            ))
            .await;

        match outcome {
            Outcome::Success { id, result } => {
                assert_eq!(id, Id::Number(1));
                assert_eq!(result, json!({"total": 5}));
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_method_is_not_found_with_bare_message() {
        let outcome = dispatcher()
            .call(Request::new("nope", None, Id::Number(1)))
            .await;

        match outcome {
            Outcome::Failure {
                error, http_status, ..
            } => {
                assert_eq!(error.code, -32601);
                assert_eq!(error.message, "Method not found");
                assert_eq!(http_status, 400);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validation_failure_is_invalid_params() {
        let outcome = dispatcher()
            .call(Request::new("add", Some(json!({"a": 2})), Id::Number(1)))
            .await;

        match outcome {
            Outcome::Failure {
                error, http_status, ..
            } => {
                assert_eq!(error.code, -32602);
                assert!(error.message.contains("missing a required argument: 'b'"));
                assert_eq!(http_status, 400);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_internal_error_is_redacted() {
        let outcome = dispatcher()
            .call(Request::new("fail", None, Id::Number(7)))
            .await;

        match outcome {
            Outcome::Failure {
                error, http_status, ..
            } => {
                assert_eq!(error.code, -32000);
                assert_eq!(error.message, "Unhandled error in method fail");
                assert!(!error.message.contains("database"));
                assert_eq!(http_status, 500);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_panic_is_contained_and_redacted() {
        let outcome = dispatcher()
            .call(Request::new("panic", None, Id::Number(7)))
            .await;

        match outcome {
            Outcome::Failure { error, .. } => {
                assert_eq!(error.code, -32000);
                assert!(!error.message.contains("boom"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_return_schema_mismatch_is_an_unhandled_fault() {
        let outcome = dispatcher()
            .call(Request::new("bad_shape", None, Id::Number(3)))
            .await;

        match outcome {
            Outcome::Failure {
                error, http_status, ..
            } => {
                assert_eq!(error.code, -32000);
                assert_eq!(error.message, "Unhandled error in method bad_shape");
                // The mapping detail stays server-side.
                assert!(!error.message.contains("Not a valid integer"));
                assert!(error.data.is_none());
                assert_eq!(http_status, 500);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_application_error_keeps_its_fields() {
        let outcome = dispatcher()
            .call(Request::new("refuse", None, Id::Number(7)))
            .await;

        match outcome {
            Outcome::Failure {
                error, http_status, ..
            } => {
                assert_eq!(error.code, 12345);
                assert_eq!(error.message, "quota exhausted");
                assert_eq!(http_status, 401);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_notification_failure_produces_no_outcome() {
        let dispatched = dispatcher()
            .dispatch(Message::Notification(Notification::new("nope", None)))
            .await;
        assert!(matches!(dispatched, Dispatched::None));
    }

    #[tokio::test]
    async fn test_top_level_response_is_invalid_request() {
        let dispatched = dispatcher()
            .dispatch(Message::Response(Response::success(
                json!(1),
                Id::Number(1),
            )))
            .await;

        match dispatched {
            Dispatched::Single(Outcome::Failure {
                error, http_status, ..
            }) => {
                assert_eq!(error.code, -32600);
                assert_eq!(http_status, 400);
            }
            other => panic!("expected single failure, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_precedence() {
        let (obj, status) = classify("m", Error::Parse);
        assert_eq!((obj.code, status), (-32700, 400));

        let (obj, status) = classify("m", Error::InvalidRequest("bad".to_string()));
        assert_eq!((obj.code, status), (-32600, 400));

        let (obj, status) = classify("m", Error::Dispatch(ErrorObject::new(45678, "custom")));
        assert_eq!((obj.code, status), (45678, 500));
    }
}
