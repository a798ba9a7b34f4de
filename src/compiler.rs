//! # Compiler
//!
//! One full run: load the API document, resolve its definitions, and bind
//! the published schemas when the document requests bindings.
//!
//! Configuration errors are reported before resolution starts. A run that
//! fails returns no schemas.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::binder::{
    BindError, Binder, BindingSpec, CollectionHandle, CollectionStore, ExtensionLoader,
};
use crate::definition::{ApiDocument, DefinitionError, DocumentSource};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{resolve_all, ResolveError, SchemaSet};

/// Result type for compile runs
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors of a compile run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Bind(#[from] BindError),
}

impl CompileError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Config(_) => "SPECBIND_CONFIG_ERROR",
            CompileError::Definition(e) => e.code(),
            CompileError::Resolve(e) => e.code(),
            CompileError::Bind(e) => e.code(),
        }
    }
}

/// Collaborators for the binding step
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Store collections are created in
    pub store: Option<Arc<dyn CollectionStore>>,
    /// Source of extensions named by bindings
    pub extensions: Option<Arc<dyn ExtensionLoader>>,
}

impl CompileOptions {
    /// Options with no store and no extensions
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a collection store
    pub fn with_store(mut self, store: Arc<dyn CollectionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use an extension loader
    pub fn with_extensions(mut self, loader: Arc<dyn ExtensionLoader>) -> Self {
        self.extensions = Some(loader);
        self
    }
}

/// Output of a successful run
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Published schemas
    pub schemas: SchemaSet,
    /// Created collections keyed by definition name
    pub collections: BTreeMap<String, CollectionHandle>,
    /// Bound definition names that had no schema
    pub skipped: Vec<String>,
    /// Bindings the document requested
    pub bindings: Option<BindingSpec>,
}

/// Compile an API document.
///
/// # Errors
///
/// - `Config` if no document is supplied, or the document requests
///   bindings and no store is configured; both are checked before any
///   definition is resolved
/// - the first loader, resolver or binder error
pub fn compile(source: Option<DocumentSource>, options: &CompileOptions) -> CompileResult<Compilation> {
    let source = source.ok_or_else(|| CompileError::Config("API document not supplied".into()))?;
    let document = ApiDocument::from_source(source)?;
    compile_document(document, options)
}

/// Compile an already-loaded API document
pub fn compile_document(document: ApiDocument, options: &CompileOptions) -> CompileResult<Compilation> {
    let definitions = document.definitions.len().to_string();
    let bindings_count = document
        .bindings
        .as_ref()
        .map(BindingSpec::len)
        .unwrap_or(0)
        .to_string();
    log_event_with_fields(
        Event::DocumentLoaded,
        &[
            ("definitions", definitions.as_str()),
            ("bindings", bindings_count.as_str()),
        ],
    );

    let wants_bindings = document.bindings.as_ref().is_some_and(|spec| !spec.is_empty());
    let store = options.store.as_deref();
    if wants_bindings && store.is_none() {
        return Err(CompileError::Config(
            "a collection store is required when the document requests bindings".into(),
        ));
    }

    let schemas = resolve_all(&document.definitions)?.into_schema_set();

    let (bindings, store) = match (document.bindings, store) {
        (Some(spec), Some(store)) if !spec.is_empty() => (spec, store),
        (other, _) => {
            return Ok(Compilation {
                schemas,
                collections: BTreeMap::new(),
                skipped: Vec::new(),
                bindings: other,
            })
        }
    };

    let mut binder = Binder::new(store);
    if let Some(loader) = options.extensions.as_deref() {
        binder = binder.with_extensions(loader);
    }
    let outcome = binder.bind(schemas, &bindings)?;

    Ok(Compilation {
        schemas: outcome.schemas,
        collections: outcome.collections,
        skipped: outcome.skipped,
        bindings: Some(bindings),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::MemoryStore;
    use serde_json::json;

    fn document() -> serde_json::Value {
        json!({
            "definitions": {
                "Pet": {
                    "properties": {
                        "name": { "type": "string" },
                        "price": { "type": "number" }
                    }
                }
            }
        })
    }

    #[test]
    fn test_no_source_is_config_error() {
        let err = compile(None, &CompileOptions::new()).unwrap_err();
        assert_eq!(err, CompileError::Config("API document not supplied".into()));
        assert_eq!(err.code(), "SPECBIND_CONFIG_ERROR");
    }

    #[test]
    fn test_compile_without_bindings() {
        let mut doc = document();
        doc["definitions"]["Pet"]["properties"]["price"] = json!({ "type": "double" });

        let compilation = compile(Some(doc.into()), &CompileOptions::new()).unwrap();
        assert!(compilation.schemas.contains("Pet"));
        assert!(compilation.collections.is_empty());
        assert!(compilation.bindings.is_none());
    }

    #[test]
    fn test_resolve_error_propagates() {
        let err = compile(Some(document().into()), &CompileOptions::new()).unwrap_err();
        assert_eq!(err, CompileError::Resolve(ResolveError::UnrecognizedType("number".into())));
        assert_eq!(err.code(), "SPECBIND_UNRECOGNIZED_TYPE");
    }

    #[test]
    fn test_bindings_require_store() {
        let doc = json!({
            "definitions": { "Pet": { "properties": { "name": { "type": "string" } } } },
            "x-persistence": { "models": { "Pet": {} } }
        });

        let err = compile(Some(doc.into()), &CompileOptions::new()).unwrap_err();
        assert!(matches!(err, CompileError::Config(_)));
    }

    #[test]
    fn test_missing_store_reported_before_resolution() {
        let doc = json!({
            "definitions": {
                "Pet": { "properties": { "owner": { "$ref": "Owner" } } }
            },
            "x-persistence": { "models": { "Pet": {} } }
        });

        let err = compile(Some(doc.into()), &CompileOptions::new()).unwrap_err();
        assert!(matches!(err, CompileError::Config(_)), "{:?}", err);
    }

    #[test]
    fn test_empty_bindings_need_no_store() {
        let doc = json!({
            "definitions": { "Pet": { "properties": { "name": { "type": "string" } } } },
            "x-persistence": { "type": "memory", "models": {} }
        });

        let compilation = compile(Some(doc.into()), &CompileOptions::new()).unwrap();
        assert!(compilation.bindings.unwrap().is_empty());
    }

    #[test]
    fn test_compile_binds_into_store() {
        let doc = json!({
            "definitions": { "Pet": { "properties": { "name": { "type": "string" } } } },
            "x-persistence": { "models": { "Pet": { "collection": "pets" } } }
        });
        let store = Arc::new(MemoryStore::new());
        let options = CompileOptions::new().with_store(store.clone());

        let compilation = compile(Some(doc.into()), &options).unwrap();
        assert_eq!(compilation.collections["Pet"].name, "pets");
        assert_eq!(store.collection_names(), vec!["pets".to_string()]);
    }
}
