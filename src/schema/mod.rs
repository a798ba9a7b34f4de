//! Schema resolution for specbind
//!
//! Turns a definition set into store-ready schemas.
//!
//! # Design Principles
//!
//! - Each definition is resolved at most once per run
//! - Shared references share one resolved schema (`Arc` identity)
//! - First error wins; a failed run yields no schemas
//! - Only local `#/definitions/<name>` references
//! - Synchronous depth-first recursion, no suspension points

mod cache;
mod errors;
mod mapper;
mod resolver;
mod types;
mod validator;

pub use cache::{is_error_shape, ResolutionCache, SchemaSet, ERROR_SHAPE_MARKER};
pub use errors::{ResolveError, ResolveResult};
pub use mapper::{is_scalar_kind, map_scalar, SCALAR_KINDS};
pub use resolver::{parse_reference, resolve_all, SchemaResolver};
pub use types::{DocumentSchema, ResolvedField, ResolvedSchema, TargetType};
pub use validator::{SchemaValidator, ValidationError};
