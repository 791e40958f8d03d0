//! Method registry
//!
//! Maps a method name to everything dispatch needs: the handler, the
//! parameter schema, the return schema, and the documentation text. The
//! registry is populated through the builder before the endpoint exists
//! and is read-only afterwards (shared behind an `Arc`), so concurrent
//! dispatch needs no locking.
//!
//! Registering a name twice replaces the earlier entry: last registration
//! wins.

use crate::handler::Handler;
use crate::schema::{ParamsSchema, Schema};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything known about one registered method
///
/// Built fluently and handed to [`MethodRegistry::register`] (usually via
/// [`EndpointBuilder::register`](crate::EndpointBuilder::register)):
///
/// ```rust
/// use jroh_server::{from_fn, MethodEntry};
/// use jroh_server::schema::{Param, ParamsSchema, Schema};
///
/// let entry = MethodEntry::new("scale", from_fn(|p| async move { Ok(p.unwrap_or_default()) }))
///     .params(ParamsSchema::new(vec![Param::required("factor", Schema::Integer)]))
///     .returns(Schema::Any)
///     .summary("Scale a point by a factor.");
/// assert_eq!(entry.name(), "scale");
/// ```
pub struct MethodEntry {
    name: String,
    handler: Arc<dyn Handler>,
    params: ParamsSchema,
    returns: Schema,
    summary: String,
    description: String,
}

impl MethodEntry {
    /// Create an entry with an empty parameter schema and an unchecked
    /// return schema.
    pub fn new(name: impl Into<String>, handler: Box<dyn Handler>) -> Self {
        Self {
            name: name.into(),
            handler: Arc::from(handler),
            params: ParamsSchema::empty(),
            returns: Schema::Any,
            summary: String::new(),
            description: String::new(),
        }
    }

    /// Attach the parameter schema.
    pub fn params(mut self, params: ParamsSchema) -> Self {
        self.params = params;
        self
    }

    /// Attach the return schema; results failing it are treated as server
    /// faults.
    pub fn returns(mut self, returns: Schema) -> Self {
        self.returns = returns;
        self
    }

    /// One-line summary for documentation output.
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Longer description for documentation output.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The public method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the implementation.
    pub fn handler(&self) -> Arc<dyn Handler> {
        Arc::clone(&self.handler)
    }

    /// The declared parameter schema.
    pub fn params_schema(&self) -> &ParamsSchema {
        &self.params
    }

    /// The declared return schema.
    pub fn return_schema(&self) -> &Schema {
        &self.returns
    }

    /// Documentation summary (may be empty).
    pub fn doc_summary(&self) -> &str {
        &self.summary
    }

    /// Documentation description (may be empty).
    pub fn doc_description(&self) -> &str {
        &self.description
    }
}

/// Name-keyed table of registered methods
///
/// Registration is the only mutation path; lookups never mutate.
#[derive(Default)]
pub struct MethodRegistry {
    methods: HashMap<String, Arc<MethodEntry>>,
}

impl MethodRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry, replacing any prior entry with the same name.
    pub fn register(&mut self, entry: MethodEntry) {
        let name = entry.name().to_string();
        if self.methods.insert(name.clone(), Arc::new(entry)).is_some() {
            tracing::debug!(method = %name, "replaced existing method registration");
        }
    }

    /// Look up a method by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<MethodEntry>> {
        self.methods.get(name).cloned()
    }

    /// Whether a method is registered under `name`.
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// All registered names, sorted for stable output.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::from_fn;

    fn ok_handler(value: serde_json::Value) -> Box<dyn Handler> {
        from_fn(move |_| {
            let value = value.clone();
            async move { Ok(value) }
        })
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = MethodRegistry::new();
        registry.register(MethodEntry::new("ping", ok_handler(serde_json::json!("pong"))));

        assert!(registry.has_method("ping"));
        assert!(!registry.has_method("pong"));
        assert_eq!(registry.lookup("ping").unwrap().name(), "ping");
        assert!(registry.lookup("pong").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration_replaces() {
        let mut registry = MethodRegistry::new();
        registry.register(MethodEntry::new("m", ok_handler(serde_json::json!(1))));
        registry.register(MethodEntry::new("m", ok_handler(serde_json::json!(2))));

        assert_eq!(registry.len(), 1);
        let entry = registry.lookup("m").unwrap();
        let result = entry.handler().handle(None).await.unwrap();
        assert_eq!(result, serde_json::json!(2));
    }

    #[test]
    fn test_method_names_are_sorted() {
        let mut registry = MethodRegistry::new();
        registry.register(MethodEntry::new("b", ok_handler(serde_json::Value::Null)));
        registry.register(MethodEntry::new("a", ok_handler(serde_json::Value::Null)));
        assert_eq!(registry.method_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_entry_carries_doc_text() {
        let entry = MethodEntry::new("m", ok_handler(serde_json::Value::Null))
            .summary("Move a point.")
            .description("Longer text.");
        assert_eq!(entry.doc_summary(), "Move a point.");
        assert_eq!(entry.doc_description(), "Longer text.");
    }
}
