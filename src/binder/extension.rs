//! # Schema Extensions
//!
//! An extension takes a resolved schema and returns an extended copy.
//! Extensions never touch the shared schema they are given.
//!
//! Extension files live in one directory, one JSON file per extension:
//!
//! ```json
//! { "fields": { "createdAt": "dateTime", "tags": ["string"] } }
//! ```
//!
//! A field kind is a primitive kind, or a one-element array of one for a
//! primitive array. Fields are appended in name order; a field the schema
//! already declares is replaced in place.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::Deserialize;

use super::errors::{BindError, BindResult};
use crate::schema::{map_scalar, ResolvedField, ResolvedSchema};

/// A named schema transformation
pub trait Extension: Send + Sync + Debug {
    /// Extension name
    fn name(&self) -> &str;

    /// Return an extended copy of the schema
    fn apply(&self, schema: &ResolvedSchema) -> BindResult<ResolvedSchema>;
}

/// Source of extensions by name
pub trait ExtensionLoader: Send + Sync + Debug {
    /// Load the named extension
    fn load(&self, name: &str) -> BindResult<Arc<dyn Extension>>;
}

/// Field kind as written in an extension file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldKind {
    /// Primitive kind
    Scalar(String),
    /// One-element array naming the element kind
    Array(Vec<String>),
}

/// Extension that adds primitive fields to a document schema
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldsExtension {
    #[serde(skip)]
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, FieldKind>,
}

impl FieldsExtension {
    /// Create an empty extension
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// Parse an extension from JSON text
    pub fn from_json(name: impl Into<String>, text: &str) -> BindResult<Self> {
        let name = name.into();
        let mut extension: FieldsExtension = serde_json::from_str(text)
            .map_err(|e| BindError::extension_failed(&name, e.to_string()))?;
        extension.name = name;
        Ok(extension)
    }

    fn resolve_kind(&self, field: &str, kind: &FieldKind) -> BindResult<ResolvedField> {
        let failed = |reason: String| BindError::extension_failed(&self.name, reason);
        match kind {
            FieldKind::Scalar(kind) => map_scalar(kind)
                .map(ResolvedField::Primitive)
                .map_err(|e| failed(format!("field `{}`: {}", field, e))),
            FieldKind::Array(kinds) => match kinds.as_slice() {
                [kind] => map_scalar(kind)
                    .map(ResolvedField::PrimitiveArray)
                    .map_err(|e| failed(format!("field `{}`: {}", field, e))),
                _ => Err(failed(format!(
                    "field `{}`: array kind must name exactly one element kind",
                    field
                ))),
            },
        }
    }
}

impl Extension for FieldsExtension {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, schema: &ResolvedSchema) -> BindResult<ResolvedSchema> {
        let ResolvedSchema::Document(document) = schema else {
            return Err(BindError::extension_failed(
                &self.name,
                "cannot extend a primitive schema",
            ));
        };

        let mut extended = document.clone();
        for (field, kind) in &self.fields {
            extended.insert(field.clone(), self.resolve_kind(field, kind)?);
        }
        Ok(ResolvedSchema::Document(extended))
    }
}

/// Loads `<dir>/<name>.json` extension files
#[derive(Debug, Clone)]
pub struct DirectoryExtensionLoader {
    dir: PathBuf,
}

impl DirectoryExtensionLoader {
    /// Create a loader over a directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory extensions are read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> BindResult<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(BindError::extension_failed(name, "invalid extension name"));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

impl ExtensionLoader for DirectoryExtensionLoader {
    fn load(&self, name: &str) -> BindResult<Arc<dyn Extension>> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(BindError::ExtensionNotFound(name.to_string()));
        }

        let text = std::fs::read_to_string(&path)
            .map_err(|e| BindError::extension_failed(name, e.to_string()))?;
        Ok(Arc::new(FieldsExtension::from_json(name, &text)?))
    }
}

/// In-memory registry of extensions
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    extensions: RwLock<HashMap<String, Arc<dyn Extension>>>,
}

impl ExtensionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension under its own name, replacing any previous one
    pub fn register(&self, extension: Arc<dyn Extension>) -> BindResult<()> {
        let mut extensions = self
            .extensions
            .write()
            .map_err(|_| BindError::Store("Lock poisoned".into()))?;
        extensions.insert(extension.name().to_string(), extension);
        Ok(())
    }

    /// Number of registered extensions
    pub fn len(&self) -> usize {
        self.extensions.read().map(|e| e.len()).unwrap_or(0)
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExtensionLoader for ExtensionRegistry {
    fn load(&self, name: &str) -> BindResult<Arc<dyn Extension>> {
        let extensions = self
            .extensions
            .read()
            .map_err(|_| BindError::Store("Lock poisoned".into()))?;
        extensions
            .get(name)
            .cloned()
            .ok_or_else(|| BindError::ExtensionNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DocumentSchema, TargetType};
    use tempfile::TempDir;

    fn pet_schema() -> ResolvedSchema {
        let mut pet = DocumentSchema::new();
        pet.insert("name", ResolvedField::Primitive(TargetType::Text));
        ResolvedSchema::Document(pet)
    }

    #[test]
    fn test_apply_appends_fields() {
        let ext = FieldsExtension::new("timestamps")
            .with_field("createdAt", FieldKind::Scalar("dateTime".into()))
            .with_field("tags", FieldKind::Array(vec!["string".into()]));

        let schema = pet_schema();
        let extended = ext.apply(&schema).unwrap();
        let doc = extended.as_document().unwrap();

        let names: Vec<&str> = doc.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "createdAt", "tags"]);
        assert_eq!(
            doc.get("createdAt"),
            Some(&ResolvedField::Primitive(TargetType::Timestamp))
        );
        assert_eq!(
            doc.get("tags"),
            Some(&ResolvedField::PrimitiveArray(TargetType::Text))
        );

        // Input untouched
        assert_eq!(schema.as_document().unwrap().len(), 1);
    }

    #[test]
    fn test_apply_rejects_primitive_schema() {
        let ext = FieldsExtension::new("timestamps");
        let err = ext
            .apply(&ResolvedSchema::Primitive(TargetType::Text))
            .unwrap_err();
        assert_eq!(err.code(), "SPECBIND_EXTENSION_FAILED");
    }

    #[test]
    fn test_apply_rejects_unknown_kind() {
        let ext = FieldsExtension::new("bad").with_field("x", FieldKind::Scalar("uuid".into()));
        let err = ext.apply(&pet_schema()).unwrap_err();
        assert!(err.to_string().contains("uuid"));
    }

    #[test]
    fn test_apply_rejects_multi_kind_array() {
        let ext = FieldsExtension::new("bad").with_field(
            "x",
            FieldKind::Array(vec!["string".into(), "integer".into()]),
        );
        assert!(ext.apply(&pet_schema()).is_err());
    }

    #[test]
    fn test_directory_loader() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("timestamps.json"),
            r#"{ "fields": { "createdAt": "dateTime" } }"#,
        )
        .unwrap();

        let loader = DirectoryExtensionLoader::new(temp.path());
        let ext = loader.load("timestamps").unwrap();
        assert_eq!(ext.name(), "timestamps");

        let extended = ext.apply(&pet_schema()).unwrap();
        assert!(extended.as_document().unwrap().contains("createdAt"));
    }

    #[test]
    fn test_directory_loader_missing_file() {
        let temp = TempDir::new().unwrap();
        let loader = DirectoryExtensionLoader::new(temp.path());
        assert_eq!(
            loader.load("absent").unwrap_err(),
            BindError::ExtensionNotFound("absent".into())
        );
    }

    #[test]
    fn test_directory_loader_rejects_path_names() {
        let temp = TempDir::new().unwrap();
        let loader = DirectoryExtensionLoader::new(temp.path());
        let err = loader.load("../secrets").unwrap_err();
        assert_eq!(err.code(), "SPECBIND_EXTENSION_FAILED");
    }

    #[test]
    fn test_directory_loader_bad_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("broken.json"), "{ not json").unwrap();
        let loader = DirectoryExtensionLoader::new(temp.path());
        let err = loader.load("broken").unwrap_err();
        assert_eq!(err.code(), "SPECBIND_EXTENSION_FAILED");
    }

    #[test]
    fn test_registry() {
        let registry = ExtensionRegistry::new();
        assert!(registry.is_empty());
        registry
            .register(Arc::new(FieldsExtension::new("audit")))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.load("audit").unwrap().name(), "audit");
        assert!(matches!(
            registry.load("other"),
            Err(BindError::ExtensionNotFound(_))
        ));
    }
}
