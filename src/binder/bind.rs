//! # Binder
//!
//! Hands resolved schemas to a collection store, one binding entry at a time.
//!
//! - Entries are processed in the order the document lists them
//! - An entry whose definition has no published schema is skipped with a warning
//! - Extensions are applied to a private copy; the published schema is never changed
//! - The first store or extension error aborts the run

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::binding::{BindingEntry, BindingSpec};
use super::errors::BindResult;
use super::extension::ExtensionLoader;
use super::store::{CollectionHandle, CollectionStore};
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::schema::{ResolvedSchema, SchemaSet};

/// Result of one binding run
#[derive(Debug, Clone, Serialize)]
pub struct BindOutcome {
    /// Created collections keyed by definition name
    pub collections: BTreeMap<String, CollectionHandle>,
    /// Definition names that were skipped, in processing order
    pub skipped: Vec<String>,
    /// The full published schema set, unchanged by binding
    pub schemas: SchemaSet,
}

/// Binds resolved schemas to named collections
#[derive(Debug)]
pub struct Binder<'a> {
    store: &'a dyn CollectionStore,
    extensions: Option<&'a dyn ExtensionLoader>,
}

impl<'a> Binder<'a> {
    /// Create a binder over a store, without extensions
    pub fn new(store: &'a dyn CollectionStore) -> Self {
        Self {
            store,
            extensions: None,
        }
    }

    /// Use an extension loader
    pub fn with_extensions(mut self, loader: &'a dyn ExtensionLoader) -> Self {
        self.extensions = Some(loader);
        self
    }

    /// Create one collection per binding entry.
    ///
    /// # Errors
    ///
    /// The first `BindError` from an extension or the store. Collections
    /// created before the failure are left in the store.
    pub fn bind(&self, schemas: SchemaSet, spec: &BindingSpec) -> BindResult<BindOutcome> {
        let entries = spec.len().to_string();
        let scope = ObservationScope::with_fields(
            "BIND",
            &[("entries", entries.as_str()), ("store", self.store.store_type())],
        );

        match self.bind_entries(&schemas, spec) {
            Ok((collections, skipped)) => {
                let created = collections.len().to_string();
                let skipped_count = skipped.len().to_string();
                scope.complete_with_fields(&[
                    ("created", created.as_str()),
                    ("skipped", skipped_count.as_str()),
                ]);
                Ok(BindOutcome {
                    collections,
                    skipped,
                    schemas,
                })
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    fn bind_entries(
        &self,
        schemas: &SchemaSet,
        spec: &BindingSpec,
    ) -> BindResult<(BTreeMap<String, CollectionHandle>, Vec<String>)> {
        let mut collections = BTreeMap::new();
        let mut skipped = Vec::new();

        for (definition, entry) in &spec.entries {
            let Some(schema) = schemas.get(definition) else {
                log_event_with_fields(
                    Event::BindingSkipped,
                    &[
                        ("definition", definition.as_str()),
                        ("reason", "no schema available"),
                    ],
                );
                skipped.push(definition.clone());
                continue;
            };

            let schema = self.apply_extensions(definition, entry, schema)?;
            let handle = self.store.create_collection(&entry.collection, schema)?;
            log_event_with_fields(
                Event::CollectionCreated,
                &[
                    ("definition", definition.as_str()),
                    ("collection", handle.name.as_str()),
                ],
            );
            collections.insert(definition.clone(), handle);
        }

        Ok((collections, skipped))
    }

    fn apply_extensions(
        &self,
        definition: &str,
        entry: &BindingEntry,
        schema: &Arc<ResolvedSchema>,
    ) -> BindResult<Arc<ResolvedSchema>> {
        if entry.extensions.is_empty() {
            return Ok(Arc::clone(schema));
        }
        let Some(loader) = self.extensions else {
            let requested = entry.extensions.join(",");
            log_event_with_fields(
                Event::ExtensionsUnavailable,
                &[("definition", definition), ("extensions", requested.as_str())],
            );
            return Ok(Arc::clone(schema));
        };

        let mut extended: ResolvedSchema = (**schema).clone();
        for name in &entry.extensions {
            extended = loader.load(name)?.apply(&extended)?;
            log_event_with_fields(
                Event::ExtensionApplied,
                &[("definition", definition), ("extension", name.as_str())],
            );
        }
        Ok(Arc::new(extended))
    }
}
