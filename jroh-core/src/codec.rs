//! Decoding and encoding of JSON-RPC 2.0 bodies
//!
//! Serde handles the mechanical part; this module adds what the dispatch
//! pipeline needs on top:
//!
//! - **Parse vs. shape**: a body that is not JSON at all is a Parse error
//!   (-32700), while valid JSON that is not a JSON-RPC envelope is an
//!   Invalid Request (-32600). The two carry different HTTP status
//!   semantics downstream, so the distinction is made here, once.
//! - **Batch detection**: an array body becomes [`Message::Batch`] with raw
//!   elements, so one malformed item fails alone instead of failing the
//!   whole batch.
//!
//! # Examples
//!
//! ```rust
//! use jroh_core::codec;
//!
//! let msg = codec::decode(r#"{"jsonrpc":"2.0","method":"translate","id":1}"#).unwrap();
//! assert!(msg.is_request());
//!
//! let batch = codec::decode(r#"[{"jsonrpc":"2.0","method":"a","id":1}]"#).unwrap();
//! assert!(batch.is_batch());
//! ```

use crate::error::{Error, Result};
use crate::types::{Message, Response};
use serde::Serialize;

/// Decode a raw body into a [`Message`].
///
/// Decoding happens in two steps: first parse to a generic JSON value (so
/// arrays can be routed to the batch variant), then match the value against
/// the message grammar.
///
/// # Errors
///
/// - [`Error::Parse`] when the body is not valid JSON
/// - [`Error::InvalidRequest`] when the JSON is not a valid envelope, or
///   the batch array is empty (forbidden by the spec)
pub fn decode(data: &str) -> Result<Message> {
    let value: serde_json::Value = serde_json::from_str(data).map_err(|_| Error::Parse)?;

    if let serde_json::Value::Array(items) = value {
        if items.is_empty() {
            return Err(Error::InvalidRequest("batch cannot be empty".to_string()));
        }
        return Ok(Message::Batch(items));
    }

    serde_json::from_value(value)
        .map_err(|_| Error::InvalidRequest("not a valid JSON-RPC message".to_string()))
}

/// Decode one raw element of a batch.
///
/// Never yields [`Message::Batch`]; nested batches are not valid elements
/// and fail like any other malformed item.
pub fn decode_item(value: serde_json::Value) -> Result<Message> {
    if value.is_array() {
        return Err(Error::InvalidRequest(
            "nested batches are not allowed".to_string(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|_| Error::InvalidRequest("invalid message in batch".to_string()))
}

/// Encode any serializable message to a JSON string.
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a batch of responses as a JSON array.
pub fn encode_batch(responses: &[Response]) -> Result<String> {
    serde_json::to_string(responses).map_err(|e| Error::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Id, Request};

    #[test]
    fn test_decode_request_notification_response() {
        assert!(decode(r#"{"jsonrpc":"2.0","method":"t","id":1}"#)
            .unwrap()
            .is_request());
        assert!(decode(r#"{"jsonrpc":"2.0","method":"t"}"#)
            .unwrap()
            .is_notification());
        let msg = decode(r#"{"jsonrpc":"2.0","result":42,"id":1}"#).unwrap();
        assert!(matches!(msg, Message::Response(_)));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        match decode("foo") {
            Err(Error::Parse) => {}
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(matches!(decode(""), Err(Error::Parse)));
    }

    #[test]
    fn test_wrong_shape_is_invalid_request_not_parse_error() {
        match decode(r#"{"hello": "world"}"#) {
            Err(Error::InvalidRequest(_)) => {}
            other => panic!("expected invalid request, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        assert!(matches!(decode("[]"), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_batch_keeps_raw_items() {
        let msg = decode(r#"[{"jsonrpc":"2.0","method":"a","id":1}, {"bogus": true}]"#).unwrap();
        match msg {
            Message::Batch(items) => {
                assert_eq!(items.len(), 2);
                assert!(decode_item(items[0].clone()).is_ok());
                assert!(decode_item(items[1].clone()).is_err());
            }
            other => panic!("expected batch, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_batch_items_are_rejected() {
        let item = serde_json::json!([{"jsonrpc": "2.0", "method": "a", "id": 1}]);
        assert!(matches!(decode_item(item), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_encode_round_trip() {
        let req = Request::new("t", Some(serde_json::json!({"a": 1})), Id::Number(1));
        let encoded = encode(&req).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert!(decoded.is_request());
    }

    #[test]
    fn test_encode_batch_is_an_array() {
        let responses = vec![
            Response::success(serde_json::json!(1), Id::Number(1)),
            Response::success(serde_json::json!(2), Id::Number(2)),
        ];
        let encoded = encode_batch(&responses).unwrap();
        assert!(encoded.starts_with('[') && encoded.ends_with(']'));
    }
}
