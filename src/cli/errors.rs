//! CLI-specific error types
//!
//! Every CLI error ends the process with exit code 1. Errors raised by a
//! run keep the code of the underlying error.

use std::fmt;
use std::io;

use crate::binder::BindError;
use crate::compiler::CompileError;
use crate::definition::DefinitionError;
use crate::schema::ResolveError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Load, resolve or bind failure, with its own code
    RunFailed(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SPECBIND_CLI_CONFIG_ERROR",
            Self::IoError => "SPECBIND_CLI_IO_ERROR",
            Self::RunFailed(code) => *code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<CompileError> for CliError {
    fn from(e: CompileError) -> Self {
        match e {
            CompileError::Config(msg) => Self::config_error(msg),
            other => Self::new(CliErrorCode::RunFailed(other.code()), other.to_string()),
        }
    }
}

impl From<DefinitionError> for CliError {
    fn from(e: DefinitionError) -> Self {
        CompileError::from(e).into()
    }
}

impl From<ResolveError> for CliError {
    fn from(e: ResolveError) -> Self {
        CompileError::from(e).into()
    }
}

impl From<BindError> for CliError {
    fn from(e: BindError) -> Self {
        CompileError::from(e).into()
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_errors_keep_their_code() {
        let err: CliError = ResolveError::MissingDefinition("Owner".into()).into();
        assert_eq!(err.code_str(), "SPECBIND_MISSING_DEFINITION");
        assert!(err.message().contains("Owner"));
    }

    #[test]
    fn test_compile_config_error_maps_to_config() {
        let err: CliError = CompileError::Config("API document not supplied".into()).into();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
        assert_eq!(err.message(), "API document not supplied");
    }

    #[test]
    fn test_display() {
        let err = CliError::io_error("broken pipe");
        assert_eq!(err.to_string(), "SPECBIND_CLI_IO_ERROR: broken pipe");
    }
}
