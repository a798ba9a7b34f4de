//! Resolution cache and published schema set
//!
//! The cache is owned by exactly one resolution run. It only grows, and only
//! the resolver writes to it. A run that fails drops its cache; callers only
//! ever see a cache that resolved completely.

use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::types::ResolvedSchema;

/// Definition names containing this marker are never published
pub const ERROR_SHAPE_MARKER: &str = "Error";

/// Checks if a definition name matches the reserved error-shape convention
pub fn is_error_shape(name: &str) -> bool {
    name.contains(ERROR_SHAPE_MARKER)
}

/// Definition name -> shared resolved schema, in insertion order
#[derive(Debug, Default)]
pub struct ResolutionCache {
    index: HashMap<String, usize>,
    entries: Vec<(String, Arc<ResolvedSchema>)>,
}

impl ResolutionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached schema
    pub fn get(&self, name: &str) -> Option<&Arc<ResolvedSchema>> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Checks if a definition is cached
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of cached definitions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ResolvedSchema>)> {
        self.entries.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    /// Record a resolved schema. The first schema stored under a name wins.
    pub(super) fn insert(&mut self, name: &str, schema: Arc<ResolvedSchema>) -> Arc<ResolvedSchema> {
        if let Some(existing) = self.get(name) {
            return Arc::clone(existing);
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), Arc::clone(&schema)));
        schema
    }

    /// Publish the cache as a schema set, dropping error-shape definitions
    /// that were only resolved because something referenced them.
    pub fn into_schema_set(self) -> SchemaSet {
        let schemas = self
            .entries
            .into_iter()
            .filter(|(name, _)| !is_error_shape(name))
            .collect();
        SchemaSet { schemas }
    }
}

/// Complete set of resolved schemas produced by a successful run
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    schemas: Vec<(String, Arc<ResolvedSchema>)>,
}

impl SchemaSet {
    /// Get a schema by definition name
    pub fn get(&self, name: &str) -> Option<&Arc<ResolvedSchema>> {
        self.schemas
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, schema)| schema)
    }

    /// Checks if a schema exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Definition names in resolution order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate in resolution order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ResolvedSchema>)> {
        self.schemas.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    /// Number of schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True when the set is empty
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Serialize for SchemaSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.schemas.len()))?;
        for (name, schema) in &self.schemas {
            map.serialize_entry(name, schema.as_ref())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::TargetType;

    fn text() -> Arc<ResolvedSchema> {
        Arc::new(ResolvedSchema::Primitive(TargetType::Text))
    }

    #[test]
    fn test_error_shape_is_case_sensitive_substring() {
        assert!(is_error_shape("Error"));
        assert!(is_error_shape("ApiError"));
        assert!(is_error_shape("ErrorModel"));
        assert!(!is_error_shape("error"));
        assert!(!is_error_shape("Pet"));
    }

    #[test]
    fn test_first_insert_wins() {
        let mut cache = ResolutionCache::new();
        let first = cache.insert("Name", text());
        let second = cache.insert("Name", text());

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cache = ResolutionCache::new();
        cache.insert("Owner", text());
        cache.insert("Address", text());
        cache.insert("Pet", text());

        let names: Vec<&str> = cache.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Owner", "Address", "Pet"]);
    }

    #[test]
    fn test_schema_set_drops_error_shapes() {
        let mut cache = ResolutionCache::new();
        cache.insert("Pet", text());
        cache.insert("ApiError", text());

        let set = cache.into_schema_set();
        assert!(set.contains("Pet"));
        assert!(!set.contains("ApiError"));
        assert_eq!(set.len(), 1);
    }
}
