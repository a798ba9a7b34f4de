//! Binding specification
//!
//! Parsed from the `x-persistence` section of an API document:
//!
//! ```json
//! "x-persistence": {
//!   "type": "memory",
//!   "models": {
//!     "Pet": { "collection": "pets", "plugins": ["timestamps"] }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How one resolved schema is bound to a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingEntry {
    /// Name of the collection to create
    pub collection: String,
    /// Extensions applied to the schema before the collection is created, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
}

impl BindingEntry {
    /// Bind to a collection without extensions
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            extensions: Vec::new(),
        }
    }

    /// Append an extension name
    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.push(name.into());
        self
    }
}

/// Definition name -> binding entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSpec {
    /// Declared persistence type, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_type: Option<String>,
    /// Entries keyed by definition name, in document order
    pub entries: IndexMap<String, BindingEntry>,
}

impl BindingSpec {
    /// Create an empty spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_entry(mut self, definition: impl Into<String>, entry: BindingEntry) -> Self {
        self.entries.insert(definition.into(), entry);
        self
    }

    /// True when no bindings are requested
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Raw `x-persistence` section as written in a document
#[derive(Debug, Deserialize)]
pub(crate) struct PersistenceSection {
    #[serde(rename = "type", default)]
    store_type: Option<String>,
    #[serde(default)]
    models: IndexMap<String, ModelSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelSection {
    #[serde(default)]
    collection: Option<String>,
    #[serde(default)]
    plugins: Vec<String>,
}

impl From<PersistenceSection> for BindingSpec {
    fn from(section: PersistenceSection) -> Self {
        let entries = section
            .models
            .into_iter()
            .map(|(name, model)| {
                let entry = BindingEntry {
                    collection: model.collection.unwrap_or_else(|| name.clone()),
                    extensions: model.plugins,
                };
                (name, entry)
            })
            .collect();

        Self {
            store_type: section.store_type,
            entries,
        }
    }
}
