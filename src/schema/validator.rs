//! Document validation against a resolved schema
//!
//! Validation semantics:
//! - Field types match the resolved target type
//! - Arrays are homogeneous
//! - Nested documents are validated recursively
//! - Null is accepted for any field
//! - Undeclared fields are stripped, not rejected
//!
//! Timestamps are RFC 3339 strings.

use serde_json::{Map, Value};
use thiserror::Error;

use super::types::{DocumentSchema, ResolvedField, ResolvedSchema, TargetType};

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}': expected {expected}, got {actual}")]
pub struct ValidationError {
    /// Field path (e.g., "owner.address.city")
    pub field: String,
    /// Expected type
    pub expected: String,
    /// Actual JSON type found
    pub actual: String,
}

impl ValidationError {
    fn type_mismatch(field: &str, expected: &str, actual: &Value) -> Self {
        Self {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: json_type_name(actual).to_string(),
        }
    }
}

/// Validates documents against a resolved schema.
///
/// The validator never mutates its input; `validate` returns the accepted
/// document with undeclared fields removed.
pub struct SchemaValidator<'a> {
    schema: &'a ResolvedSchema,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator for one schema
    pub fn new(schema: &'a ResolvedSchema) -> Self {
        Self { schema }
    }

    /// Validates a document, returning it without undeclared fields.
    ///
    /// # Errors
    ///
    /// `ValidationError` naming the first field whose value does not match.
    pub fn validate(&self, document: &Value) -> Result<Value, ValidationError> {
        validate_schema(self.schema, document, "$root")
    }
}

fn validate_schema(
    schema: &ResolvedSchema,
    value: &Value,
    path: &str,
) -> Result<Value, ValidationError> {
    match schema {
        ResolvedSchema::Primitive(target) => {
            validate_primitive(*target, value, path)?;
            Ok(value.clone())
        }
        ResolvedSchema::Document(fields) => {
            let obj = value
                .as_object()
                .ok_or_else(|| ValidationError::type_mismatch(path, "object", value))?;
            validate_object(fields, obj, path).map(Value::Object)
        }
    }
}

fn validate_object(
    fields: &DocumentSchema,
    obj: &Map<String, Value>,
    path_prefix: &str,
) -> Result<Map<String, Value>, ValidationError> {
    let mut accepted = Map::new();

    for (name, field) in fields.iter() {
        let Some(value) = obj.get(name) else {
            continue;
        };
        let field_path = make_path(path_prefix, name);
        if !value.is_null() {
            let checked = validate_field(field, value, &field_path)?;
            accepted.insert(name.to_string(), checked);
        } else {
            accepted.insert(name.to_string(), Value::Null);
        }
    }

    Ok(accepted)
}

fn validate_field(field: &ResolvedField, value: &Value, path: &str) -> Result<Value, ValidationError> {
    match field {
        ResolvedField::Primitive(target) => {
            validate_primitive(*target, value, path)?;
            Ok(value.clone())
        }
        ResolvedField::Nested(schema) => validate_schema(schema, value, path),
        ResolvedField::PrimitiveArray(target) => {
            let arr = value
                .as_array()
                .ok_or_else(|| ValidationError::type_mismatch(path, "array", value))?;
            for (i, elem) in arr.iter().enumerate() {
                validate_primitive(*target, elem, &format!("{}[{}]", path, i))?;
            }
            Ok(value.clone())
        }
        ResolvedField::NestedArray(schema) => {
            let arr = value
                .as_array()
                .ok_or_else(|| ValidationError::type_mismatch(path, "array", value))?;
            arr.iter()
                .enumerate()
                .map(|(i, elem)| validate_schema(schema, elem, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
    }
}

fn validate_primitive(target: TargetType, value: &Value, path: &str) -> Result<(), ValidationError> {
    let ok = match target {
        TargetType::Number => value.is_number(),
        TargetType::Text => value.is_string(),
        TargetType::Boolean => value.is_boolean(),
        TargetType::Timestamp => value
            .as_str()
            .map(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
            .unwrap_or(false),
    };
    if ok {
        Ok(())
    } else {
        Err(ValidationError::type_mismatch(path, target.type_name(), value))
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() || prefix == "$root" {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
