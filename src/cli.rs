// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use crate::core::config::ScriptLevel;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 出力フォーマット
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

/// Altergen - Schema Delta to DDL Compiler
///
/// Turns a schema delta between two model snapshots into an ordered,
/// drop-aware PostgreSQL ALTER script.
#[derive(Parser, Debug)]
#[command(name = "altergen")]
#[command(author = "Altergen Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Schema delta to DDL compiler for PostgreSQL")]
#[command(long_about = "Altergen - Schema Delta to DDL Compiler

Turns a schema delta between two model snapshots into an ordered,
drop-aware PostgreSQL ALTER script.

Altergen helps you:
  • Generate container-level (whole schema) or entity-level (tables only) scripts
  • Keep destructive statements visible but commented out when needed
  • Detect whether a delta would drop anything before you apply it

Supported databases: PostgreSQL 10 and later")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Export a schema delta from your modeling tool:  delta.json
  2. Preview drop statements:                        altergen check --delta delta.json
  3. Generate the ALTER script:                      altergen generate --delta delta.json

For detailed help on each command, use: altergen <command> --help")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an ALTER script from a schema delta
    ///
    /// Reads the delta JSON, compiles it into DDL statements in dependency
    /// order and prints the script for the selected level.
    ///
    /// EXAMPLES:
    ///   # Print the container-level script
    ///   altergen generate --delta delta.json
    ///
    ///   # Only tables and foreign keys
    ///   altergen generate --delta delta.json --level entity
    ///
    ///   # Keep drop statements commented out and write to a file
    ///   altergen generate --delta delta.json --skip-drop-statements --output alter.sql
    Generate {
        /// Path to the schema delta JSON file
        #[arg(short, long, value_name = "FILE")]
        delta: PathBuf,

        /// Script level (container or entity)
        #[arg(short, long, value_name = "LEVEL")]
        level: Option<ScriptLevel>,

        /// Comment out DROP statements instead of applying them
        #[arg(long)]
        skip_drop_statements: bool,

        /// Write the script to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Report drop statements contained in a schema delta
    ///
    /// Compiles the delta without printing the script and lists, per level,
    /// the DROP statements the generated script would execute.
    ///
    /// EXAMPLES:
    ///   # Check a delta before generating
    ///   altergen check --delta delta.json
    ///
    ///   # Machine-readable report
    ///   altergen check --delta delta.json --format json
    Check {
        /// Path to the schema delta JSON file
        #[arg(short, long, value_name = "FILE")]
        delta: PathBuf,
    },
}
