//! Error handling for textsql
//!
//! This module defines the error type shared by every stage of the import
//! pipeline and the query runner. Structural failures are returned as
//! `TextSqlError`; row-level failures during a load are counted and logged by
//! the loader and never reach this type.

use thiserror::Error;

/// TextSqlError represents all fatal errors that can occur in textsql
///
/// Each variant maps to one of the structural failure modes: the input
/// stream, the embedded store, configuration values that cannot be resolved,
/// or the console hand-off.
#[derive(Error, Debug)]
pub enum TextSqlError {
    /// Error during file system operations (reading input, temp dirs)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while parsing delimited input that cannot be skipped
    #[error("Input parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error reported by the embedded SQLite store
    #[error("Database error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// Error decoding a `0x..` delimiter specification
    #[error("Invalid hex delimiter: {0}")]
    HexError(#[from] hex::FromHexError),

    /// Error compiling an internal pattern
    #[error("Invalid pattern: {0}")]
    RegexError(#[from] regex::Error),

    /// Delimiter that does not resolve to a single usable byte
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// The input stream ended before the first record
    #[error("Input contains no records")]
    EmptyInput,

    /// A header row (or first record) without any fields
    #[error("Cannot build table '{0}' without columns")]
    NoColumns(String),

    /// The store has no columns recorded for a table that should exist
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// A primary-key conflict while no duplicate policy was requested
    #[error("Duplicate key in record {record}: {source}")]
    DuplicateKey {
        record: usize,
        #[source]
        source: rusqlite::Error,
    },

    /// The store rolled back the import transaction (policy `rollback`)
    #[error("Import rolled back by duplicate key in record {0}")]
    ImportRolledBack(usize),

    /// Console mode needs a file on disk, which piped input cannot provide
    #[error("Can not open console with pipe input, read a file instead")]
    ConsoleWithStdin,

    /// The interactive sqlite3 shell could not be run or exited with failure
    #[error("Console failed: {0}")]
    ConsoleFailed(String),
}

/// Result type alias for operations that can produce a TextSqlError
pub type TextSqlResult<T> = std::result::Result<T, TextSqlError>;
