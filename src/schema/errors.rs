//! Schema resolution errors
//!
//! Error codes:
//! - SPECBIND_UNRECOGNIZED_TYPE
//! - SPECBIND_UNSUPPORTED_REFERENCE
//! - SPECBIND_MISSING_DEFINITION
//! - SPECBIND_CYCLIC_REFERENCE
//!
//! Every resolution error is fatal: the run stops at the first one and no
//! schema set is produced.

use thiserror::Error;

/// Result type for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors that abort a resolution run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Unrecognized schema type: `{0}`")]
    UnrecognizedType(String),

    #[error("Unsupported schema reference `{0}`")]
    UnsupportedReference(String),

    #[error("Missing schema definition for `{0}`")]
    MissingDefinition(String),

    #[error("Cyclic schema reference through `{0}`")]
    CyclicReference(String),
}

impl ResolveError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::UnrecognizedType(_) => "SPECBIND_UNRECOGNIZED_TYPE",
            ResolveError::UnsupportedReference(_) => "SPECBIND_UNSUPPORTED_REFERENCE",
            ResolveError::MissingDefinition(_) => "SPECBIND_MISSING_DEFINITION",
            ResolveError::CyclicReference(_) => "SPECBIND_CYCLIC_REFERENCE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ResolveError::UnrecognizedType("file".into()).code(),
            "SPECBIND_UNRECOGNIZED_TYPE"
        );
        assert_eq!(
            ResolveError::UnsupportedReference("Owner".into()).code(),
            "SPECBIND_UNSUPPORTED_REFERENCE"
        );
        assert_eq!(
            ResolveError::MissingDefinition("Owner".into()).code(),
            "SPECBIND_MISSING_DEFINITION"
        );
        assert_eq!(
            ResolveError::CyclicReference("Node".into()).code(),
            "SPECBIND_CYCLIC_REFERENCE"
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ResolveError::UnrecognizedType("file".into()).to_string(),
            "Unrecognized schema type: `file`"
        );
        assert_eq!(
            ResolveError::MissingDefinition("Owner".into()).to_string(),
            "Missing schema definition for `Owner`"
        );
    }
}
