//! JSON I/O handling for CLI
//!
//! - Input: API documents read from a file
//! - Output: single JSON object via stdout
//! - Logs go to stderr and never mix with responses

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};
use crate::definition::DocumentSource;

/// Read an API document from a file
pub fn read_document(path: &Path) -> CliResult<DocumentSource> {
    let bytes = fs::read(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(DocumentSource::Bytes(bytes))
}

/// Build a success response
pub fn ok_response(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

/// Build an error response
pub fn error_response(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&ok_response(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&error_response(code, message))
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
