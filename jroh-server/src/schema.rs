//! Declarative parameter schemas and the argument validator
//!
//! A method's signature is described by an explicit [`ParamsSchema`] value
//! attached at registration time: ordered named parameters, each with a
//! [`Schema`] and a required flag. No reflection is involved: the schema is
//! plain data, so the registry stays decoupled from any introspection
//! mechanism.
//!
//! Validation happens in two stages, and the distinction matters for the
//! error the caller sees:
//!
//! 1. **Binding**: matching the incoming params (named object or
//!    positional array) against the declared parameter list. Failures here
//!    read like signature errors (`missing a required argument: 'dy'`) and
//!    carry no structured data.
//! 2. **Schema validation**: type-checking each bound value. Failures
//!    produce a nested field-path error mapping, e.g.
//!    `{"p": {"_schema": ["Invalid input type."]}}`, returned both as the
//!    error `data` and rendered into the message.
//!
//! Both stages classify as invalid params (-32602, HTTP 400); only the
//! wording and the presence of `data` differ.
//!
//! # Examples
//!
//! ```rust
//! use jroh_server::schema::{Field, Param, ParamsSchema, Schema};
//!
//! let point = Schema::object(
//!     "Point",
//!     vec![
//!         Field::required("x", Schema::Integer),
//!         Field::required("y", Schema::Integer),
//!     ],
//! );
//! let schema = ParamsSchema::new(vec![
//!     Param::required("p", point),
//!     Param::required("dx", Schema::Integer),
//!     Param::required("dy", Schema::Integer),
//! ]);
//!
//! let params = serde_json::json!({"p": {"x": 1, "y": 2}, "dx": 3, "dy": 4});
//! let bound = schema.validate(Some(&params)).unwrap();
//! assert_eq!(bound["dx"], serde_json::json!(3));
//! ```

use jroh_core::Error;
use serde_json::{json, Map, Value};

/// Type description for a single value
///
/// The small vocabulary the validator understands. `Object` and `Array`
/// nest, `Any` opts a parameter out of type checking.
#[derive(Debug, Clone)]
pub enum Schema {
    /// JSON integer (i64/u64 range; booleans and floats do not qualify)
    Integer,
    /// Any JSON number
    Number,
    /// JSON string
    String,
    /// JSON boolean
    Boolean,
    /// JSON object with declared fields
    Object(ObjectSchema),
    /// JSON array with homogeneous element type
    Array(Box<Schema>),
    /// Anything goes
    Any,
}

/// Named object type with declared fields
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    /// Type name, used in documentation output
    pub name: String,
    /// Declared fields, in declaration order
    pub fields: Vec<Field>,
}

/// One field of an [`ObjectSchema`]
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
}

impl Field {
    /// A field that must be present.
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
        }
    }

    /// A field that may be omitted.
    pub fn optional(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: false,
        }
    }
}

impl Schema {
    /// Shorthand for a named object schema.
    pub fn object(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Schema::Object(ObjectSchema {
            name: name.into(),
            fields,
        })
    }

    /// Shorthand for an array schema.
    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    /// Check `value` against this schema.
    ///
    /// On failure the returned JSON value is the error mapping for this
    /// position: a list of messages for scalars and arrays-of-the-wrong
    /// -kind, an object keyed by field name (or `_schema` for a wholesale
    /// type mismatch) for objects, and an object keyed by index for
    /// element errors inside arrays.
    pub fn check(&self, value: &Value) -> Result<(), Value> {
        match self {
            Schema::Any => Ok(()),
            Schema::Integer => {
                if value.is_i64() || value.is_u64() {
                    Ok(())
                } else {
                    Err(json!(["Not a valid integer."]))
                }
            }
            Schema::Number => {
                if value.is_number() {
                    Ok(())
                } else {
                    Err(json!(["Not a valid number."]))
                }
            }
            Schema::String => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err(json!(["Not a valid string."]))
                }
            }
            Schema::Boolean => {
                if value.is_boolean() {
                    Ok(())
                } else {
                    Err(json!(["Not a valid boolean."]))
                }
            }
            Schema::Array(items) => {
                let elements = match value.as_array() {
                    Some(elements) => elements,
                    None => return Err(json!(["Not a valid list."])),
                };
                let mut errors = Map::new();
                for (index, element) in elements.iter().enumerate() {
                    if let Err(e) = items.check(element) {
                        errors.insert(index.to_string(), e);
                    }
                }
                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(Value::Object(errors))
                }
            }
            Schema::Object(object) => object.check(value),
        }
    }

    /// Render this schema as a plain JSON-schema-style value for
    /// documentation output.
    pub fn describe(&self) -> Value {
        match self {
            Schema::Integer => json!({"type": "integer"}),
            Schema::Number => json!({"type": "number"}),
            Schema::String => json!({"type": "string"}),
            Schema::Boolean => json!({"type": "boolean"}),
            Schema::Any => json!({}),
            Schema::Array(items) => json!({"type": "array", "items": items.describe()}),
            Schema::Object(object) => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for field in &object.fields {
                    properties.insert(field.name.clone(), field.schema.describe());
                    if field.required {
                        required.push(Value::String(field.name.clone()));
                    }
                }
                json!({
                    "type": "object",
                    "title": object.name,
                    "properties": properties,
                    "required": required,
                })
            }
        }
    }
}

impl ObjectSchema {
    fn check(&self, value: &Value) -> Result<(), Value> {
        let map = match value.as_object() {
            Some(map) => map,
            // Non-object where an object type was declared
            None => return Err(json!({"_schema": ["Invalid input type."]})),
        };

        let mut errors = Map::new();
        for field in &self.fields {
            match map.get(&field.name) {
                Some(v) => {
                    if let Err(e) = field.schema.check(v) {
                        errors.insert(field.name.clone(), e);
                    }
                }
                None if field.required => {
                    errors.insert(
                        field.name.clone(),
                        json!(["Missing data for required field."]),
                    );
                }
                None => {}
            }
        }
        for key in map.keys() {
            if !self.fields.iter().any(|f| &f.name == key) {
                errors.insert(key.clone(), json!(["Unknown field."]));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Value::Object(errors))
        }
    }
}

/// One declared parameter of a method
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
}

impl Param {
    /// A parameter the caller must supply.
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
        }
    }

    /// A parameter the caller may omit.
    pub fn optional(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: false,
        }
    }
}

/// Ordered named parameters of a method
///
/// Order matters: positional (array) params bind by position, named
/// (object) params bind by key, and both end up as the same canonical
/// name-to-value map handed to the handler.
#[derive(Debug, Clone, Default)]
pub struct ParamsSchema {
    params: Vec<Param>,
}

impl ParamsSchema {
    /// Schema with the given parameters, in declaration order.
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    /// Schema for a method taking no parameters.
    pub fn empty() -> Self {
        Self { params: Vec::new() }
    }

    /// Declared parameters, in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Bind and validate incoming params.
    ///
    /// Returns the canonical named-argument map on success. Binding
    /// failures come back as [`Error::InvalidParams`] with no `data`;
    /// schema failures carry the field-path mapping in `data` and render
    /// it into the message.
    pub fn validate(&self, params: Option<&Value>) -> Result<Map<String, Value>, Error> {
        let bound = self.bind(params)?;

        let mut errors = Map::new();
        for param in &self.params {
            if let Some(value) = bound.get(&param.name) {
                if let Err(e) = param.schema.check(value) {
                    errors.insert(param.name.clone(), e);
                }
            }
        }
        if !errors.is_empty() {
            let mapping = Value::Object(errors);
            return Err(Error::InvalidParams {
                message: format!("invalid params: {}", mapping),
                data: Some(mapping),
            });
        }

        Ok(bound)
    }

    /// Match params against the declared parameter list, converting
    /// positional arguments to named ones. Signature-level failures only;
    /// no type checking happens here.
    fn bind(&self, params: Option<&Value>) -> Result<Map<String, Value>, Error> {
        let mut bound = Map::new();

        match params {
            None => {}
            Some(Value::Object(named)) => {
                for key in named.keys() {
                    if !self.params.iter().any(|p| &p.name == key) {
                        return Err(binding_error(format!(
                            "got an unexpected keyword argument '{}'",
                            key
                        )));
                    }
                }
                for (key, value) in named {
                    bound.insert(key.clone(), value.clone());
                }
            }
            Some(Value::Array(positional)) => {
                if positional.len() > self.params.len() {
                    return Err(binding_error("too many positional arguments".to_string()));
                }
                for (param, value) in self.params.iter().zip(positional) {
                    bound.insert(param.name.clone(), value.clone());
                }
            }
            Some(_) => {
                return Err(binding_error(
                    "params must be an object or an array".to_string(),
                ));
            }
        }

        for param in &self.params {
            if param.required && !bound.contains_key(&param.name) {
                return Err(binding_error(format!(
                    "missing a required argument: '{}'",
                    param.name
                )));
            }
        }

        Ok(bound)
    }

    /// Render the parameter list as a JSON-schema-style object for
    /// documentation output.
    pub fn describe(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &self.params {
            properties.insert(param.name.clone(), param.schema.describe());
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn binding_error(message: String) -> Error {
    Error::InvalidParams {
        message,
        data: None,
    }
}
