//! specbind - resolve API definitions into store-ready schemas
//!
//! A run has three stages:
//! 1. `definition`: load an API document into a definition set and binding spec
//! 2. `schema`: resolve every definition into a shared, store-ready schema
//! 3. `binder`: create one collection per requested binding
//!
//! `compiler::compile` wires the stages together; `cli` wraps it in a binary.

pub mod binder;
pub mod cli;
pub mod compiler;
pub mod definition;
pub mod observability;
pub mod schema;

pub use compiler::{compile, Compilation, CompileError, CompileOptions, CompileResult};
