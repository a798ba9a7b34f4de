//! Primitive kind to storage type mapping

use super::errors::{ResolveError, ResolveResult};
use super::types::TargetType;

/// Every primitive kind an API document may use
pub const SCALAR_KINDS: [&str; 11] = [
    "integer", "long", "float", "double", "string", "byte", "binary", "password", "boolean",
    "date", "dateTime",
];

/// Map a primitive kind to its storage type.
///
/// # Errors
///
/// `UnrecognizedType` for any kind outside [`SCALAR_KINDS`].
pub fn map_scalar(kind: &str) -> ResolveResult<TargetType> {
    match kind {
        "integer" | "long" | "float" | "double" => Ok(TargetType::Number),
        "string" | "password" | "byte" | "binary" => Ok(TargetType::Text),
        "boolean" => Ok(TargetType::Boolean),
        "date" | "dateTime" => Ok(TargetType::Timestamp),
        other => Err(ResolveError::UnrecognizedType(other.to_string())),
    }
}

/// Checks if a kind is one of [`SCALAR_KINDS`]
pub fn is_scalar_kind(kind: &str) -> bool {
    SCALAR_KINDS.contains(&kind)
}
