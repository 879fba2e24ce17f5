//! CLI argument parsing module for textsql
//!
//! This module handles parsing command-line arguments using the clap crate.
//! Values are kept as raw strings here; `config::AppConfig` resolves them
//! into typed settings once at startup.

use anyhow::Result;
use clap::Parser;

/// Command-line arguments for textsql
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Load delimited text into SQLite and run SQL against it"
)]
pub struct TextSqlArgs {
    /// SQL command(s) to run on the data, separated by `;`
    #[clap(long, default_value = "", help = "SQL Command(s) to run on the data")]
    pub sql: String,

    /// Source file to load, or `stdin`
    #[clap(
        long,
        default_value = "stdin",
        help = "Source file to load, or defaults to stdin"
    )]
    pub source: String,

    /// Field delimiter
    ///
    /// `tab` selects a tab character, `0x##` gives the delimiter as hex bytes,
    /// anything else uses its first character.
    #[clap(
        long,
        default_value = ",",
        help = "Delimiter between fields -dlm=tab for tab, \
                -dlm=0x## to specify a character code in hex"
    )]
    pub dlm: String,

    /// Primary key column(s) for the imported table, comma separated
    #[clap(long, default_value = "", help = "Primary key(s) for imported table, comma separated")]
    pub pk: String,

    /// How to resolve records whose primary key already exists
    #[clap(
        long,
        default_value = "",
        help = "How to deal with duplicated records when a primary key is set \
                (replace/rollback/abort/fail/ignore)"
    )]
    pub dup: String,

    /// Print per-column statistics after the import
    #[clap(long, help = "Show variable summary after imported the data")]
    pub showvar: bool,

    /// Treat the first record as a header row
    #[clap(long, help = "Treat file as having the first row as a header row")]
    pub header: bool,

    /// Name of the table to load into
    #[clap(
        long = "table-name",
        default_value = "tbl",
        help = "Override the default table name (tbl)"
    )]
    pub table_name: String,

    /// Keep the SQLite database on disk at this path
    #[clap(long = "save-to", help = "If set, sqlite3 db is left on disk at this path")]
    pub save_to: Option<String>,

    /// Hand the loaded database to the sqlite3 shell after the queries run
    #[clap(long, help = "After all commands are run, open sqlite3 console with this data")]
    pub console: bool,

    /// Enable verbose diagnostic output
    #[clap(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}

/// Parse command-line arguments into the TextSqlArgs structure
pub fn parse_args() -> Result<TextSqlArgs> {
    Ok(TextSqlArgs::parse())
}
