//! Machine-readable endpoint documentation
//!
//! Everything a registry knows about its methods (names, summaries,
//! parameter schemas, return schemas) rendered into a JSON document a
//! client or UI can consume. The shape is a small API description listing
//! the generic endpoint and one path per registered method, sorted by name
//! for stable output.

use crate::registry::MethodRegistry;
use serde::Serialize;
use serde_json::{json, Value};

/// Documentation for one registered method
#[derive(Debug, Clone, Serialize)]
pub struct MethodDoc {
    /// The registered method name
    pub name: String,
    /// One-line summary, empty when none was provided
    pub summary: String,
    /// Longer description, empty when none was provided
    pub description: String,
    /// JSON-schema-style description of the parameters
    pub params: Value,
    /// JSON-schema-style description of the return value
    pub returns: Value,
}

/// Describe every registered method, sorted by name.
pub fn describe(registry: &MethodRegistry) -> Vec<MethodDoc> {
    registry
        .method_names()
        .into_iter()
        .filter_map(|name| registry.lookup(&name))
        .map(|entry| MethodDoc {
            name: entry.name().to_string(),
            summary: entry.doc_summary().to_string(),
            description: entry.doc_description().to_string(),
            params: entry.params_schema().describe(),
            returns: entry.return_schema().describe(),
        })
        .collect()
}

/// Render the full endpoint description document.
///
/// `base_path` is the mount point of the generic endpoint, e.g. `/api`;
/// per-method paths hang off it.
pub fn spec_document(registry: &MethodRegistry, base_path: &str) -> Value {
    let base = base_path.trim_end_matches('/');
    let methods: Vec<Value> = describe(registry)
        .into_iter()
        .map(|doc| {
            json!({
                "name": doc.name,
                "path": format!("{}/{}", base, doc.name),
                "summary": doc.summary,
                "description": doc.description,
                "params": doc.params,
                "returns": doc.returns,
            })
        })
        .collect();

    json!({
        "jsonrpc": "2.0",
        "endpoint": format!("{}/", base),
        "methods": methods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::from_fn;
    use crate::registry::MethodEntry;
    use crate::schema::{Param, ParamsSchema, Schema};
    use serde_json::json;

    fn registry() -> MethodRegistry {
        let mut registry = MethodRegistry::new();
        registry.register(
            MethodEntry::new("scale", from_fn(|_| async move { Ok(json!(null)) }))
                .params(ParamsSchema::new(vec![Param::required(
                    "factor",
                    Schema::Integer,
                )]))
                .returns(Schema::Integer)
                .summary("Scale a point."),
        );
        registry.register(MethodEntry::new(
            "ping",
            from_fn(|_| async move { Ok(json!("pong")) }),
        ));
        registry
    }

    #[test]
    fn test_describe_is_sorted_and_complete() {
        let docs = describe(&registry());
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "ping");
        assert_eq!(docs[1].name, "scale");
        assert_eq!(docs[1].summary, "Scale a point.");
        assert_eq!(docs[1].returns, json!({"type": "integer"}));
    }

    #[test]
    fn test_spec_document_lists_paths() {
        let doc = spec_document(&registry(), "/api");
        assert_eq!(doc["endpoint"], json!("/api/"));
        assert_eq!(doc["methods"][0]["path"], json!("/api/ping"));
        assert_eq!(doc["methods"][1]["path"], json!("/api/scale"));
    }
}
