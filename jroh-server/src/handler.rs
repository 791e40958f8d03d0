//! Handler trait and adapters for method implementations
//!
//! A [`Handler`] receives the canonical named-argument map the validator
//! produced and returns a JSON value or a [`jroh_core::Error`]. Handlers
//! are type-erased (`serde_json::Value` in and out) so the registry can
//! store them uniformly; the adapters below recover type safety at the
//! edges.
//!
//! Two ways to build one:
//!
//! - [`from_fn`]: wrap an async closure working with raw JSON values
//! - [`from_typed_fn`]: wrap an async closure taking a deserializable
//!   parameter struct and returning a serializable result
//!
//! Handlers signal domain errors by returning
//! [`ApplicationError`](jroh_core::ApplicationError) (full control over
//! code/message/data/HTTP status) or a bare
//! [`ErrorObject`](jroh_core::ErrorObject) (wire fields only, HTTP status
//! defaults to 500). Anything else they return, or any panic, is
//! classified as an unhandled fault and redacted from the client.

use jroh_core::{Error, Result};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed, pinned future a handler invocation resolves to.
///
/// Different handlers have different concrete future types; boxing gives
/// the registry a single storable type. `Send` is required so invocations
/// can run on any worker.
pub type HandlerResult = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

/// A registered method implementation
///
/// `params` is the validated named-argument object (or `None` for a
/// parameterless method invoked without params). Implementations must be
/// `Send + Sync`: the registry shares one instance across concurrent
/// requests.
pub trait Handler: Send + Sync {
    /// Invoke the method with validated parameters.
    fn handle(&self, params: Option<Value>) -> HandlerResult;
}

/// Adapter implementing [`Handler`] for an async function over raw values.
pub struct AsyncHandler<F, Fut>
where
    F: Fn(Option<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    func: F,
}

impl<F, Fut> Handler for AsyncHandler<F, Fut>
where
    F: Fn(Option<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    fn handle(&self, params: Option<Value>) -> HandlerResult {
        Box::pin((self.func)(params))
    }
}

/// Create a handler from an async function over raw JSON values.
///
/// # Examples
///
/// ```rust
/// use jroh_server::from_fn;
///
/// let handler = from_fn(|params| async move {
///     Ok(serde_json::json!({"echo": params}))
/// });
/// ```
pub fn from_fn<F, Fut>(func: F) -> Box<dyn Handler>
where
    F: Fn(Option<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Box::new(AsyncHandler { func })
}

/// Create a handler with automatic parameter and result conversion.
///
/// The validated argument map is deserialized into `P` and the returned
/// `R` is serialized back to JSON. A deserialization failure after
/// validation passed means the declared schema and the parameter struct
/// disagree (a server bug), so it surfaces as an internal error rather
/// than invalid params.
///
/// # Examples
///
/// ```rust
/// use jroh_server::from_typed_fn;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize)]
/// struct Args { a: i64, b: i64 }
///
/// #[derive(Serialize)]
/// struct Sum { total: i64 }
///
/// let handler = from_typed_fn(|args: Args| async move {
///     Ok(Sum { total: args.a + args.b })
/// });
/// ```
pub fn from_typed_fn<P, R, F, Fut>(func: F) -> Box<dyn Handler>
where
    P: serde::de::DeserializeOwned + Send + 'static,
    R: serde::Serialize + Send + 'static,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<R, Error>> + Send + 'static,
{
    // Closures are not Clone; Arc lets each invocation share the function.
    let func = Arc::new(func);

    from_fn(move |params: Option<Value>| {
        let func = Arc::clone(&func);
        async move {
            let raw = params.unwrap_or(Value::Null);
            let typed: P = serde_json::from_value(raw).map_err(|e| {
                Error::Internal(format!("params did not match handler signature: {}", e))
            })?;

            let result = func(typed).await?;

            serde_json::to_value(result).map_err(|e| Error::Serialization(e.to_string()))
        }
    })
}
