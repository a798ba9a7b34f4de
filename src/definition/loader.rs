//! API document loader
//!
//! Accepts a document as raw bytes, text, or an already-parsed JSON value
//! and extracts:
//! - `definitions`: the definition set to resolve
//! - `x-persistence`: the optional binding spec
//!
//! Field shape is classified here, once:
//! - `$ref` -> reference
//! - `type: "array"` with `items.$ref` -> reference array
//! - `type: "array"` with `items.type` -> scalar array
//! - `type` -> scalar

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::errors::{DefinitionError, DefinitionResult};
use super::types::{Definition, DefinitionSet, Field};
use crate::binder::binding::PersistenceSection;
use crate::binder::BindingSpec;

/// The forms an API document can be supplied in
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// UTF-8 JSON bytes
    Bytes(Vec<u8>),
    /// JSON text
    Text(String),
    /// Already-parsed JSON
    Value(Value),
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentSource::Bytes(bytes)
    }
}

impl From<String> for DocumentSource {
    fn from(text: String) -> Self {
        DocumentSource::Text(text)
    }
}

impl From<&str> for DocumentSource {
    fn from(text: &str) -> Self {
        DocumentSource::Text(text.to_string())
    }
}

impl From<Value> for DocumentSource {
    fn from(value: Value) -> Self {
        DocumentSource::Value(value)
    }
}

/// A loaded API document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiDocument {
    /// Definitions to resolve
    pub definitions: DefinitionSet,
    /// Bindings requested by `x-persistence`, if any
    pub bindings: Option<BindingSpec>,
}

impl ApiDocument {
    /// Load a document from any supported source
    pub fn from_source(source: DocumentSource) -> DefinitionResult<Self> {
        let value = match source {
            DocumentSource::Value(value) => value,
            DocumentSource::Text(text) => parse_json(text.as_bytes())?,
            DocumentSource::Bytes(bytes) => parse_json(&bytes)?,
        };
        Self::from_value(&value)
    }

    /// Load a document from a JSON file
    pub fn from_file(path: &Path) -> DefinitionResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            DefinitionError::InvalidDocument(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_source(DocumentSource::Bytes(bytes))
    }

    /// Load a document from a parsed JSON value
    pub fn from_value(value: &Value) -> DefinitionResult<Self> {
        let root = value.as_object().ok_or_else(|| {
            DefinitionError::InvalidDocument(format!(
                "expected a JSON object, got {}",
                json_kind(value)
            ))
        })?;

        let definitions = match root.get("definitions") {
            None | Some(Value::Null) => DefinitionSet::new(),
            Some(Value::Object(raw)) => parse_definitions(raw)?,
            Some(other) => {
                return Err(DefinitionError::InvalidDocument(format!(
                    "`definitions` must be an object, got {}",
                    json_kind(other)
                )))
            }
        };

        let bindings = match root.get("x-persistence") {
            None | Some(Value::Null) => None,
            Some(raw) => {
                let section: PersistenceSection =
                    serde_json::from_value(raw.clone()).map_err(|e| {
                        DefinitionError::InvalidDocument(format!(
                            "invalid `x-persistence` section: {}",
                            e
                        ))
                    })?;
                Some(BindingSpec::from(section))
            }
        };

        Ok(Self {
            definitions,
            bindings,
        })
    }
}

fn parse_json(bytes: &[u8]) -> DefinitionResult<Value> {
    serde_json::from_slice(bytes)
        .map_err(|e| DefinitionError::InvalidDocument(format!("invalid JSON: {}", e)))
}

fn parse_definitions(raw: &Map<String, Value>) -> DefinitionResult<DefinitionSet> {
    let mut set = DefinitionSet::new();
    for (name, value) in raw {
        set.insert(name.clone(), parse_definition(name, value)?);
    }
    Ok(set)
}

fn parse_definition(name: &str, raw: &Value) -> DefinitionResult<Definition> {
    let obj = raw
        .as_object()
        .ok_or_else(|| DefinitionError::malformed(name, "definition must be an object"))?;

    if let Some(properties) = obj.get("properties") {
        let properties = properties
            .as_object()
            .ok_or_else(|| DefinitionError::malformed(name, "`properties` must be an object"))?;

        let mut fields = Vec::with_capacity(properties.len());
        for (field_name, field) in properties {
            fields.push((field_name.clone(), parse_field(name, field_name, field)?));
        }
        return Ok(Definition::Composite(fields));
    }

    match obj.get("type").and_then(Value::as_str) {
        // an object without properties has nothing to store but is still a document
        Some("object") => Ok(Definition::Composite(Vec::new())),
        Some(kind) => Ok(Definition::simple(kind)),
        None => Err(DefinitionError::malformed(
            name,
            "definition has neither `type` nor `properties`",
        )),
    }
}

fn parse_field(definition: &str, field: &str, raw: &Value) -> DefinitionResult<Field> {
    let obj = raw.as_object().ok_or_else(|| {
        DefinitionError::malformed(definition, format!("field `{}` must be an object", field))
    })?;

    if let Some(token) = obj.get("$ref") {
        return reference_token(definition, field, token).map(Field::Reference);
    }

    match obj.get("type").and_then(Value::as_str) {
        Some("array") => {
            let items = obj.get("items").and_then(Value::as_object).ok_or_else(|| {
                DefinitionError::malformed(
                    definition,
                    format!("array field `{}` has no `items` object", field),
                )
            })?;

            if let Some(token) = items.get("$ref") {
                return reference_token(definition, field, token).map(Field::ReferenceArray);
            }
            match items.get("type").and_then(Value::as_str) {
                Some(kind) => Ok(Field::scalar_array(kind)),
                None => Err(DefinitionError::malformed(
                    definition,
                    format!("items of array field `{}` have neither `type` nor `$ref`", field),
                )),
            }
        }
        Some(kind) => Ok(Field::scalar(kind)),
        None => Err(DefinitionError::malformed(
            definition,
            format!("field `{}` has neither `type` nor `$ref`", field),
        )),
    }
}

fn reference_token(definition: &str, field: &str, raw: &Value) -> DefinitionResult<String> {
    raw.as_str().map(str::to_string).ok_or_else(|| {
        DefinitionError::malformed(
            definition,
            format!("`$ref` of field `{}` must be a string", field),
        )
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
