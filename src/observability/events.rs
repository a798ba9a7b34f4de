//! Observable events
//!
//! Events are explicit and typed. Each carries the severity it is logged at.

use std::fmt;

use super::logger::Severity;

/// Observable events in a specbind run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Input
    /// API document loaded
    DocumentLoaded,
    /// Configuration loaded
    ConfigLoaded,

    // Resolution
    /// One definition resolved and cached
    DefinitionResolved,
    /// Definition skipped by the error-shape policy
    DefinitionSkipped,

    // Binding
    /// Binding entry names a definition with no resolved schema
    BindingSkipped,
    /// Entry requests extensions but no loader is configured
    ExtensionsUnavailable,
    /// Extension applied to a schema
    ExtensionApplied,
    /// Collection created in the store
    CollectionCreated,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DocumentLoaded => "DOCUMENT_LOADED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DefinitionResolved => "DEFINITION_RESOLVED",
            Event::DefinitionSkipped => "DEFINITION_SKIPPED",
            Event::BindingSkipped => "BINDING_SKIPPED",
            Event::ExtensionsUnavailable => "EXTENSIONS_UNAVAILABLE",
            Event::ExtensionApplied => "EXTENSION_APPLIED",
            Event::CollectionCreated => "COLLECTION_CREATED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::DefinitionResolved | Event::ExtensionApplied => Severity::Trace,
            Event::BindingSkipped | Event::ExtensionsUnavailable => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
