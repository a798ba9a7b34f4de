//! Definition loading errors
//!
//! Error codes:
//! - SPECBIND_INVALID_DOCUMENT
//! - SPECBIND_MALFORMED_DEFINITION

use thiserror::Error;

/// Result type for definition loading
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// Errors raised while turning an API document into a definition set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("Unknown or invalid data object: {0}")]
    InvalidDocument(String),

    #[error("Malformed definition `{name}`: {reason}")]
    MalformedDefinition { name: String, reason: String },
}

impl DefinitionError {
    /// Malformed definition error
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DefinitionError::MalformedDefinition {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            DefinitionError::InvalidDocument(_) => "SPECBIND_INVALID_DOCUMENT",
            DefinitionError::MalformedDefinition { .. } => "SPECBIND_MALFORMED_DEFINITION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DefinitionError::InvalidDocument("x".into()).code(),
            "SPECBIND_INVALID_DOCUMENT"
        );
        assert_eq!(
            DefinitionError::malformed("Pet", "no type").code(),
            "SPECBIND_MALFORMED_DEFINITION"
        );
    }

    #[test]
    fn test_malformed_display_names_definition() {
        let err = DefinitionError::malformed("Pet", "field `tags` has no `items`");
        let display = err.to_string();
        assert!(display.contains("`Pet`"));
        assert!(display.contains("tags"));
    }
}
