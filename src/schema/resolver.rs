//! Schema resolver
//!
//! Walks the definition set depth-first and turns every definition into a
//! resolved schema:
//! - each definition is resolved at most once per run (the cache is authoritative)
//! - fields referencing the same definition share one `Arc`
//! - the first error aborts the run; nothing partial is returned
//! - definitions whose name contains `Error` are skipped by the outer iteration
//!
//! Only local references of the form `#/definitions/<name>` are supported.
//! A definition that is re-entered while it is still being resolved is a
//! cycle and fails with `CyclicReference`.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::cache::{is_error_shape, ResolutionCache};
use super::errors::{ResolveError, ResolveResult};
use super::mapper::map_scalar;
use super::types::{DocumentSchema, ResolvedField, ResolvedSchema};
use crate::definition::{Definition, DefinitionSet, Field};
use crate::observability::{log_event_with_fields, Event, ObservationScope};

static REFERENCE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn reference_pattern() -> &'static Regex {
    REFERENCE_PATTERN.get_or_init(|| {
        Regex::new(r"^#/definitions/([A-Za-z0-9_]*)$").expect("reference pattern is valid")
    })
}

/// Extract the definition name from a local reference token.
///
/// # Errors
///
/// `UnsupportedReference` if the token is not `#/definitions/<name>`.
pub fn parse_reference(token: &str) -> ResolveResult<&str> {
    reference_pattern()
        .captures(token)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str())
        .ok_or_else(|| ResolveError::UnsupportedReference(token.to_string()))
}

/// Resolve every definition of a set in one run
pub fn resolve_all(definitions: &DefinitionSet) -> ResolveResult<ResolutionCache> {
    SchemaResolver::new(definitions).resolve_all()
}

/// One resolution run over a definition set.
///
/// The cache is passed explicitly so the caller owns it; the resolver only
/// tracks which definitions are currently in progress.
pub struct SchemaResolver<'a> {
    definitions: &'a DefinitionSet,
    in_progress: HashSet<&'a str>,
}

impl<'a> SchemaResolver<'a> {
    /// Creates a resolver over the given definitions
    pub fn new(definitions: &'a DefinitionSet) -> Self {
        Self {
            definitions,
            in_progress: HashSet::new(),
        }
    }

    /// Resolves every definition in enumeration order.
    ///
    /// # Errors
    ///
    /// The first `ResolveError` encountered. The partially built cache is
    /// dropped with it.
    pub fn resolve_all(mut self) -> ResolveResult<ResolutionCache> {
        let count = self.definitions.len().to_string();
        let scope = ObservationScope::with_fields("RESOLVE", &[("definitions", count.as_str())]);

        let mut cache = ResolutionCache::new();
        match self.resolve_into(&mut cache) {
            Ok(()) => {
                let resolved = cache.len().to_string();
                scope.complete_with_fields(&[("resolved", resolved.as_str())]);
                Ok(cache)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    /// Resolves every definition into an existing cache.
    ///
    /// Definitions already cached are skipped.
    pub fn resolve_into(&mut self, cache: &mut ResolutionCache) -> ResolveResult<()> {
        let definitions = self.definitions;
        for name in definitions.names() {
            if cache.contains(name) {
                continue;
            }
            if is_error_shape(name) {
                log_event_with_fields(
                    Event::DefinitionSkipped,
                    &[("definition", name), ("reason", "reserved error shape")],
                );
                continue;
            }
            self.resolve_name(name, cache)?;
        }
        Ok(())
    }

    /// Resolves one definition by name, reusing the cached schema if present.
    ///
    /// # Errors
    ///
    /// - `MissingDefinition` if the name is neither cached nor in the set
    /// - `CyclicReference` if the definition is already being resolved
    /// - any error raised while resolving its fields
    pub fn resolve_name(
        &mut self,
        name: &str,
        cache: &mut ResolutionCache,
    ) -> ResolveResult<Arc<ResolvedSchema>> {
        if let Some(schema) = cache.get(name) {
            return Ok(Arc::clone(schema));
        }

        let (name, definition) = self
            .definitions
            .get_entry(name)
            .ok_or_else(|| ResolveError::MissingDefinition(name.to_string()))?;

        if !self.in_progress.insert(name) {
            return Err(ResolveError::CyclicReference(name.to_string()));
        }
        let resolved = self.resolve_definition(definition, cache);
        self.in_progress.remove(name);

        let schema = cache.insert(name, Arc::new(resolved?));
        log_event_with_fields(Event::DefinitionResolved, &[("definition", name)]);
        Ok(schema)
    }

    /// Resolves a definition without caching it under any name.
    ///
    /// Referenced definitions are resolved depth-first and cached as a side
    /// effect. Fields are resolved in order; the first failing field aborts.
    pub fn resolve_definition(
        &mut self,
        definition: &'a Definition,
        cache: &mut ResolutionCache,
    ) -> ResolveResult<ResolvedSchema> {
        let fields = match definition {
            Definition::Simple(kind) => return Ok(ResolvedSchema::Primitive(map_scalar(kind)?)),
            Definition::Composite(fields) => fields,
        };

        let mut document = DocumentSchema::new();
        for (field_name, field) in fields {
            let resolved = self.resolve_field(field, cache)?;
            document.insert(field_name.as_str(), resolved);
        }
        Ok(ResolvedSchema::Document(document))
    }

    fn resolve_field(
        &mut self,
        field: &'a Field,
        cache: &mut ResolutionCache,
    ) -> ResolveResult<ResolvedField> {
        match field {
            Field::Scalar(kind) => Ok(ResolvedField::Primitive(map_scalar(kind)?)),
            Field::ScalarArray(kind) => Ok(ResolvedField::PrimitiveArray(map_scalar(kind)?)),
            Field::Reference(token) => {
                let name = parse_reference(token)?;
                Ok(ResolvedField::Nested(self.resolve_name(name, cache)?))
            }
            Field::ReferenceArray(token) => {
                let name = parse_reference(token)?;
                Ok(ResolvedField::NestedArray(self.resolve_name(name, cache)?))
            }
        }
    }
}
