//! Binding of resolved schemas to a collection store
//!
//! The binder is the only part of a run with side effects:
//! - it reads the published schema set and the binding spec
//! - it creates one collection per bound definition
//! - it applies extensions to private copies of schemas
//!
//! Resolution never calls into this module.

mod bind;
pub mod binding;
mod errors;
mod extension;
mod store;

pub use bind::{BindOutcome, Binder};
pub use binding::{BindingEntry, BindingSpec};
pub use errors::{BindError, BindResult};
pub use extension::{
    DirectoryExtensionLoader, Extension, ExtensionLoader, ExtensionRegistry, FieldKind,
    FieldsExtension,
};
pub use store::{CollectionHandle, CollectionStore, MemoryStore};
