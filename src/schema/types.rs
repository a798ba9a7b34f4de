//! Resolved schema types
//!
//! Target storage types:
//! - number: integer, long, float, double
//! - text: string, password, byte, binary
//! - boolean
//! - timestamp: date, dateTime
//!
//! Nested schemas are held by `Arc` so that every field referencing the
//! same definition shares one resolved instance.

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Storage type a primitive kind maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Any numeric value
    Number,
    /// UTF-8 text
    Text,
    /// Boolean
    Boolean,
    /// Point in time
    Timestamp,
}

impl TargetType {
    /// Returns the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            TargetType::Number => "number",
            TargetType::Text => "text",
            TargetType::Boolean => "boolean",
            TargetType::Timestamp => "timestamp",
        }
    }
}

/// Resolved type of one document field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum ResolvedField {
    /// Mapped primitive
    Primitive(TargetType),
    /// Array of a mapped primitive
    PrimitiveArray(TargetType),
    /// Nested schema of another definition
    Nested(Arc<ResolvedSchema>),
    /// Array of nested schemas of another definition
    NestedArray(Arc<ResolvedSchema>),
}

impl ResolvedField {
    /// Returns the nested schema, if the field has one
    pub fn nested(&self) -> Option<&Arc<ResolvedSchema>> {
        match self {
            ResolvedField::Nested(schema) | ResolvedField::NestedArray(schema) => Some(schema),
            ResolvedField::Primitive(_) | ResolvedField::PrimitiveArray(_) => None,
        }
    }

    /// Returns true for either array variant
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            ResolvedField::PrimitiveArray(_) | ResolvedField::NestedArray(_)
        )
    }
}

/// Ordered field mapping of a document schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSchema {
    fields: Vec<(String, ResolvedField)>,
}

impl DocumentSchema {
    /// Create an empty document schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. A field that already exists is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, field: ResolvedField) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = field,
            None => self.fields.push((name, field)),
        }
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&ResolvedField> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, field)| field)
    }

    /// Checks if a field exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate fields in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when there are no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for DocumentSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

/// Store-ready schema of one definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "schema", rename_all = "snake_case")]
pub enum ResolvedSchema {
    /// Simple definition: a single mapped primitive
    Primitive(TargetType),
    /// Composite definition: field name -> resolved field
    Document(DocumentSchema),
}

impl ResolvedSchema {
    /// Returns the document fields, if this is a document schema
    pub fn as_document(&self) -> Option<&DocumentSchema> {
        match self {
            ResolvedSchema::Document(doc) => Some(doc),
            ResolvedSchema::Primitive(_) => None,
        }
    }

    /// Returns a field of a document schema
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.as_document().and_then(|doc| doc.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_type_names() {
        assert_eq!(TargetType::Number.type_name(), "number");
        assert_eq!(TargetType::Text.type_name(), "text");
        assert_eq!(TargetType::Boolean.type_name(), "boolean");
        assert_eq!(TargetType::Timestamp.type_name(), "timestamp");
    }

    #[test]
    fn test_document_insert_replaces_in_place() {
        let mut doc = DocumentSchema::new();
        doc.insert("a", ResolvedField::Primitive(TargetType::Text));
        doc.insert("b", ResolvedField::Primitive(TargetType::Number));
        doc.insert("a", ResolvedField::PrimitiveArray(TargetType::Text));

        let names: Vec<&str> = doc.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(doc.get("a").unwrap().is_array());
    }

    #[test]
    fn test_serialized_shape() {
        let mut owner = DocumentSchema::new();
        owner.insert("id", ResolvedField::Primitive(TargetType::Number));
        let owner = Arc::new(ResolvedSchema::Document(owner));

        let mut pet = DocumentSchema::new();
        pet.insert("tags", ResolvedField::PrimitiveArray(TargetType::Text));
        pet.insert("owner", ResolvedField::Nested(owner));
        let pet = ResolvedSchema::Document(pet);

        let value = serde_json::to_value(&pet).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "document",
                "schema": {
                    "tags": { "kind": "primitive_array", "type": "text" },
                    "owner": {
                        "kind": "nested",
                        "type": {
                            "kind": "document",
                            "schema": { "id": { "kind": "primitive", "type": "number" } }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_primitive_schema_has_no_fields() {
        let schema = ResolvedSchema::Primitive(TargetType::Text);
        assert!(schema.as_document().is_none());
        assert!(schema.field("anything").is_none());
    }
}
