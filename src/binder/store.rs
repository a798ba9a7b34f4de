//! # Collection Store
//!
//! The store is the only place a binding run touches shared state.
//! Implementations guard their state themselves and must be `Send + Sync`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::errors::{BindError, BindResult};
use crate::schema::{ResolvedSchema, SchemaValidator};

/// A named collection created from a resolved schema
#[derive(Debug, Clone, Serialize)]
pub struct CollectionHandle {
    /// Unique handle ID
    pub id: Uuid,
    /// Collection name
    pub name: String,
    /// Schema the collection enforces
    pub schema: Arc<ResolvedSchema>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl CollectionHandle {
    /// Create a new handle
    pub fn new(name: impl Into<String>, schema: Arc<ResolvedSchema>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            schema,
            created_at: Utc::now(),
        }
    }
}

/// Backend that turns resolved schemas into named collections
pub trait CollectionStore: Send + Sync + std::fmt::Debug {
    /// Persistence type this store implements
    fn store_type(&self) -> &str;

    /// Create a named collection enforcing the given schema
    fn create_collection(
        &self,
        name: &str,
        schema: Arc<ResolvedSchema>,
    ) -> BindResult<CollectionHandle>;

    /// Look up a collection by name
    fn collection(&self, name: &str) -> BindResult<CollectionHandle>;
}

#[derive(Debug)]
struct CollectionData {
    handle: CollectionHandle,
    documents: Vec<Value>,
}

/// In-process collection store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, CollectionData>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a document, returning it as stored.
    ///
    /// Undeclared fields are stripped before the document is stored.
    pub fn insert(&self, collection: &str, document: &Value) -> BindResult<Value> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| BindError::Store("Lock poisoned".into()))?;
        let data = collections
            .get_mut(collection)
            .ok_or_else(|| BindError::CollectionNotFound(collection.to_string()))?;

        let stored = SchemaValidator::new(&data.handle.schema)
            .validate(document)
            .map_err(|source| BindError::DocumentRejected {
                collection: collection.to_string(),
                source,
            })?;
        data.documents.push(stored.clone());
        Ok(stored)
    }

    /// All documents of a collection, in insertion order
    pub fn documents(&self, collection: &str) -> BindResult<Vec<Value>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| BindError::Store("Lock poisoned".into()))?;
        collections
            .get(collection)
            .map(|data| data.documents.clone())
            .ok_or_else(|| BindError::CollectionNotFound(collection.to_string()))
    }

    /// Names of all collections
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.collections.read() {
            Ok(collections) => collections.keys().cloned().collect(),
            Err(_) => return Vec::new(),
        };
        names.sort();
        names
    }
}

impl CollectionStore for MemoryStore {
    fn store_type(&self) -> &str {
        "memory"
    }

    fn create_collection(
        &self,
        name: &str,
        schema: Arc<ResolvedSchema>,
    ) -> BindResult<CollectionHandle> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| BindError::Store("Lock poisoned".into()))?;
        if collections.contains_key(name) {
            return Err(BindError::CollectionExists(name.to_string()));
        }

        let handle = CollectionHandle::new(name, schema);
        collections.insert(
            name.to_string(),
            CollectionData {
                handle: handle.clone(),
                documents: Vec::new(),
            },
        );
        Ok(handle)
    }

    fn collection(&self, name: &str) -> BindResult<CollectionHandle> {
        let collections = self
            .collections
            .read()
            .map_err(|_| BindError::Store("Lock poisoned".into()))?;
        collections
            .get(name)
            .map(|data| data.handle.clone())
            .ok_or_else(|| BindError::CollectionNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DocumentSchema, ResolvedField, TargetType};
    use serde_json::json;

    fn pet_schema() -> Arc<ResolvedSchema> {
        let mut pet = DocumentSchema::new();
        pet.insert("name", ResolvedField::Primitive(TargetType::Text));
        pet.insert("price", ResolvedField::Primitive(TargetType::Number));
        Arc::new(ResolvedSchema::Document(pet))
    }

    #[test]
    fn test_create_and_lookup() {
        let store = MemoryStore::new();
        let schema = pet_schema();
        let handle = store.create_collection("pets", Arc::clone(&schema)).unwrap();

        assert_eq!(handle.name, "pets");
        assert!(Arc::ptr_eq(&handle.schema, &schema));

        let found = store.collection("pets").unwrap();
        assert_eq!(found.id, handle.id);
        assert_eq!(store.collection_names(), vec!["pets".to_string()]);
    }

    #[test]
    fn test_duplicate_collection_rejected() {
        let store = MemoryStore::new();
        store.create_collection("pets", pet_schema()).unwrap();
        let err = store.create_collection("pets", pet_schema()).unwrap_err();
        assert_eq!(err, BindError::CollectionExists("pets".into()));
    }

    #[test]
    fn test_unknown_collection() {
        let store = MemoryStore::new();
        assert_eq!(
            store.collection("ghosts").unwrap_err(),
            BindError::CollectionNotFound("ghosts".into())
        );
        assert!(store.insert("ghosts", &json!({})).is_err());
    }

    #[test]
    fn test_insert_strips_and_stores() {
        let store = MemoryStore::new();
        store.create_collection("pets", pet_schema()).unwrap();

        let stored = store
            .insert("pets", &json!({ "name": "Fluffy", "price": 99.99, "notAKey": "x" }))
            .unwrap();
        assert_eq!(stored, json!({ "name": "Fluffy", "price": 99.99 }));

        let docs = store.documents("pets").unwrap();
        assert_eq!(docs, vec![stored]);
    }

    #[test]
    fn test_insert_rejects_wrong_type() {
        let store = MemoryStore::new();
        store.create_collection("pets", pet_schema()).unwrap();

        let err = store.insert("pets", &json!({ "price": "cheap" })).unwrap_err();
        assert_eq!(err.code(), "SPECBIND_DOCUMENT_REJECTED");
        assert!(store.documents("pets").unwrap().is_empty());
    }
}
