//! API definition input for specbind
//!
//! The definition set is the read-only input of a resolution run. It is
//! built once, either programmatically or by the document loader, and never
//! mutated while a run is in flight.

mod errors;
mod loader;
mod types;

pub use errors::{DefinitionError, DefinitionResult};
pub use loader::{ApiDocument, DocumentSource};
pub use types::{Definition, DefinitionSet, Field};
