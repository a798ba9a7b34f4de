//! CLI module for specbind
//!
//! Provides command-line interface for:
//! - check: load and resolve an API document
//! - compile: resolve and report requested bindings
//! - bind: full run against an in-memory store
//!
//! Every command prints exactly one JSON object on stdout.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{bind, check, compile_command, run_command, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_document, write_error, write_response};

/// Parse arguments, run the command, and report a failure on stdout.
///
/// The error is returned as well so the caller can set the exit code.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match run_command(cli.command) {
        Ok(()) => Ok(()),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}
