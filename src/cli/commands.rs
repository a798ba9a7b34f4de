//! CLI command implementations
//!
//! Every command produces one JSON value; `run_command` writes it to stdout.
//! Nothing is written for a command that fails.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::binder::{CollectionStore, DirectoryExtensionLoader, MemoryStore};
use crate::compiler::{compile, CompileOptions};
use crate::definition::ApiDocument;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::resolve_all;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_document, write_response};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding extension files (optional)
    #[serde(default)]
    pub extensions_dir: Option<String>,

    /// Collection store type (optional, default "memory")
    #[serde(default = "default_store_type")]
    pub store_type: String,

    /// Fail when a binding names a definition without a schema (default: false)
    #[serde(default)]
    pub strict_bindings: bool,
}

fn default_store_type() -> String {
    "memory".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions_dir: None,
            store_type: default_store_type(),
            strict_bindings: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        let path = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.as_str()), ("store_type", config.store_type.as_str())],
        );
        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.store_type != "memory" {
            return Err(CliError::config_error(format!(
                "Invalid store_type: '{}'. Only 'memory' is allowed.",
                self.store_type
            )));
        }

        if let Some(dir) = &self.extensions_dir {
            if dir.trim().is_empty() {
                return Err(CliError::config_error("extensions_dir must not be empty"));
            }
        }

        Ok(())
    }

    /// Extensions directory, with a command-line override taking precedence
    pub fn extensions_path(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.extensions_dir.as_ref().map(PathBuf::from))
    }
}

/// Run a CLI command
pub fn run_command(cmd: Command) -> CliResult<()> {
    let data = match cmd {
        Command::Check { input } => check(&input)?,
        Command::Compile { input } => compile_command(&input)?,
        Command::Bind {
            input,
            extensions,
            config,
        } => bind(&input, extensions, config.as_deref())?,
    };
    write_response(data)
}

/// Load and resolve a document.
///
/// Bindings are ignored; no store is involved.
pub fn check(input: &Path) -> CliResult<Value> {
    let document = ApiDocument::from_source(read_document(input)?)?;
    let schemas = resolve_all(&document.definitions)?.into_schema_set();

    Ok(json!({ "schemas": serde_json::to_value(&schemas)? }))
}

/// Resolve a document and report the bindings it requests
pub fn compile_command(input: &Path) -> CliResult<Value> {
    let document = ApiDocument::from_source(read_document(input)?)?;
    let schemas = resolve_all(&document.definitions)?.into_schema_set();

    Ok(json!({
        "schemas": serde_json::to_value(&schemas)?,
        "bindings": serde_json::to_value(&document.bindings)?,
    }))
}

/// Resolve and bind a document against an in-memory store
pub fn bind(input: &Path, extensions: Option<PathBuf>, config: Option<&Path>) -> CliResult<Value> {
    let config = match config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let store: Arc<dyn CollectionStore> = Arc::new(MemoryStore::new());
    let mut options = CompileOptions::new().with_store(store);
    if let Some(dir) = config.extensions_path(extensions) {
        if !dir.is_dir() {
            return Err(CliError::config_error(format!(
                "Extensions directory not found: {}",
                dir.display()
            )));
        }
        options = options.with_extensions(Arc::new(DirectoryExtensionLoader::new(dir)));
    }

    let compilation = compile(Some(read_document(input)?), &options)?;

    if config.strict_bindings && !compilation.skipped.is_empty() {
        return Err(CliError::config_error(format!(
            "Bindings name definitions without a schema: {}",
            compilation.skipped.join(", ")
        )));
    }

    Ok(json!({
        "collections": serde_json::to_value(&compilation.collections)?,
        "skipped": compilation.skipped,
    }))
}
