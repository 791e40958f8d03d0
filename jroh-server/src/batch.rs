//! Batch processing
//!
//! A JSON-RPC batch is an array mixing requests and notifications. Each
//! item is parsed and dispatched independently: a malformed item yields its
//! own invalid-request outcome without poisoning its siblings, and
//! notifications contribute nothing to the reply. Responses always come
//! back in input order regardless of execution mode.
//!
//! An optional size limit rejects oversized batches with a single
//! invalid-request outcome before any item runs.

use crate::dispatch::{Dispatcher, Outcome};
use jroh_core::{codec, ErrorObject, Id, Message};
use serde_json::Value;

/// Execution strategy for batch items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// Items run one after another, in order.
    #[default]
    Sequential,
    /// Items run concurrently on spawned tasks; responses are still
    /// collected in input order.
    Parallel,
}

/// Processes batch arrays on behalf of the dispatcher
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    mode: BatchMode,
    max_size: Option<usize>,
}

impl BatchProcessor {
    /// Create a processor with no size limit.
    pub fn new(mode: BatchMode) -> Self {
        Self {
            mode,
            max_size: None,
        }
    }

    /// Create a processor rejecting batches larger than `max_size`.
    pub fn with_limit(mode: BatchMode, max_size: usize) -> Self {
        Self {
            mode,
            max_size: Some(max_size),
        }
    }

    /// Process a batch, yielding one outcome per contained request.
    ///
    /// The empty-array case is rejected upstream by the codec, so `items`
    /// is never empty here; an all-notification batch legitimately yields
    /// an empty vec.
    #[tracing::instrument(skip(self, items, dispatcher), fields(len = items.len(), mode = ?self.mode))]
    pub async fn process(&self, items: Vec<Value>, dispatcher: &Dispatcher) -> Vec<Outcome> {
        if let Some(limit) = self.max_size {
            if items.len() > limit {
                tracing::warn!(limit, actual = items.len(), "batch size limit exceeded");
                return vec![Outcome::Failure {
                    id: Id::Null,
                    error: ErrorObject::batch_size_exceeded(limit, items.len()),
                    http_status: 400,
                }];
            }
        }

        match self.mode {
            BatchMode::Sequential => {
                let mut outcomes = Vec::new();
                for item in items {
                    if let Some(outcome) = Self::process_item(item, dispatcher).await {
                        outcomes.push(outcome);
                    }
                }
                outcomes
            }
            BatchMode::Parallel => {
                let tasks: Vec<_> = items
                    .into_iter()
                    .map(|item| {
                        let dispatcher = dispatcher.clone();
                        tokio::spawn(
                            async move { Self::process_item(item, &dispatcher).await },
                        )
                    })
                    .collect();

                // Awaiting in spawn order keeps responses in input order.
                let mut outcomes = Vec::new();
                for task in tasks {
                    match task.await {
                        Ok(Some(outcome)) => outcomes.push(outcome),
                        Ok(None) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "batch task failed");
                            outcomes.push(Outcome::Failure {
                                id: Id::Null,
                                error: ErrorObject::internal_error("batch task failed"),
                                http_status: 500,
                            });
                        }
                    }
                }
                outcomes
            }
        }
    }

    /// Parse and dispatch one batch item.
    ///
    /// Notifications and stray response objects yield `None`; everything
    /// else yields an outcome.
    async fn process_item(item: Value, dispatcher: &Dispatcher) -> Option<Outcome> {
        match codec::decode_item(item) {
            Ok(Message::Request(req)) => Some(dispatcher.call(req).await),
            Ok(Message::Notification(notif)) => {
                dispatcher.notify(notif).await;
                None
            }
            // Response objects and nested batches have no place inside a
            // batch; decode_item rejects the latter.
            Ok(Message::Response(_)) => None,
            Ok(Message::Batch(_)) | Err(_) => Some(Outcome::Failure {
                id: Id::Null,
                error: ErrorObject::invalid_request("invalid batch item"),
                http_status: 400,
            }),
        }
    }
}
