//! CLI argument definitions using clap
//!
//! Commands:
//! - specbind check --input <path>
//! - specbind compile --input <path>
//! - specbind bind --input <path> [--extensions <dir>] [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// specbind - resolve API definitions into store-ready schemas
#[derive(Parser, Debug)]
#[command(name = "specbind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and resolve an API document, printing the schema set
    Check {
        /// Path to the API document (JSON)
        #[arg(long)]
        input: PathBuf,
    },

    /// Resolve an API document and print its schemas and bindings
    Compile {
        /// Path to the API document (JSON)
        #[arg(long)]
        input: PathBuf,
    },

    /// Resolve and bind an API document against an in-memory store
    Bind {
        /// Path to the API document (JSON)
        #[arg(long)]
        input: PathBuf,

        /// Directory holding extension files (overrides the config file)
        #[arg(long)]
        extensions: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
