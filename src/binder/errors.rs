//! # Binder Errors

use thiserror::Error;

use crate::schema::ValidationError;

/// Result type for binding operations
pub type BindResult<T> = Result<T, BindError>;

/// Binding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("Collection already exists: {0}")]
    CollectionExists(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Extension not found: {0}")]
    ExtensionNotFound(String),

    #[error("Extension `{name}` failed: {reason}")]
    ExtensionFailed { name: String, reason: String },

    #[error("Document rejected by collection `{collection}`: {source}")]
    DocumentRejected {
        collection: String,
        #[source]
        source: ValidationError,
    },

    #[error("Store error: {0}")]
    Store(String),
}

impl BindError {
    /// Extension failure
    pub fn extension_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        BindError::ExtensionFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            BindError::CollectionExists(_) => "SPECBIND_COLLECTION_EXISTS",
            BindError::CollectionNotFound(_) => "SPECBIND_COLLECTION_NOT_FOUND",
            BindError::ExtensionNotFound(_) => "SPECBIND_EXTENSION_NOT_FOUND",
            BindError::ExtensionFailed { .. } => "SPECBIND_EXTENSION_FAILED",
            BindError::DocumentRejected { .. } => "SPECBIND_DOCUMENT_REJECTED",
            BindError::Store(_) => "SPECBIND_STORE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            BindError::CollectionExists("pets".into()).code(),
            "SPECBIND_COLLECTION_EXISTS"
        );
        assert_eq!(
            BindError::extension_failed("timestamps", "bad").code(),
            "SPECBIND_EXTENSION_FAILED"
        );
        assert_eq!(BindError::Store("x".into()).code(), "SPECBIND_STORE_ERROR");
    }

    #[test]
    fn test_rejection_display_includes_field() {
        let err = BindError::DocumentRejected {
            collection: "pets".into(),
            source: ValidationError {
                field: "name".into(),
                expected: "text".into(),
                actual: "number".into(),
            },
        };
        let display = err.to_string();
        assert!(display.contains("pets"));
        assert!(display.contains("'name'"));
    }
}
