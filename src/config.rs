//! Configuration module for textsql
//!
//! This module provides the run configuration. It is built once at startup
//! from the command-line arguments and passed by reference to each component,
//! so no component reads global state.

use std::path::PathBuf;

use crate::cli::TextSqlArgs;
use crate::error::{TextSqlError, TextSqlResult};
use crate::file_handler::{expand_path, InputSource};
use crate::resolver::{resolve_primary_keys, resolve_separator, DuplicatePolicy};

/// Settings consumed by the import pipeline
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Table to create (if missing) and load into
    pub table_name: String,
    /// Delimiter byte between fields
    pub separator: u8,
    /// Whether the first record names the columns
    pub has_header: bool,
    /// Caller-declared primary-key columns, verbatim and in order
    pub primary_keys: Vec<String>,
    pub duplicate_policy: DuplicatePolicy,
    /// Emit per-row diagnostics and progress markers
    pub verbose: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            table_name: "tbl".to_string(),
            separator: b',',
            has_header: false,
            primary_keys: Vec::new(),
            duplicate_policy: DuplicatePolicy::None,
            verbose: false,
        }
    }
}

/// Application configuration
///
/// Holds the resolved import settings plus the run-level choices: where the
/// input comes from, where the store lives, and what to do after the load.
#[derive(Debug, Clone)]
pub struct AppConfig {
    import: ImportOptions,

    source: InputSource,

    /// Keep the store on disk at this path
    save_to: Option<PathBuf>,

    /// Hand off to the sqlite3 shell after the queries
    console: bool,

    /// Print the column summary report after the load
    show_summary: bool,

    /// `;`-separated SQL to run after the load
    commands: String,
}

impl AppConfig {
    /// Resolve command-line arguments into a configuration
    ///
    /// # Returns
    /// * `Ok(AppConfig)` - All values resolved
    /// * `Err` - If the delimiter can't be resolved, a path can't be expanded,
    ///   or console mode is combined with piped input
    pub fn from_args(args: &TextSqlArgs) -> TextSqlResult<Self> {
        let source = InputSource::from_spec(&args.source)?;
        if args.console && matches!(source, InputSource::Stdin) {
            return Err(TextSqlError::ConsoleWithStdin);
        }

        let save_to = match args.save_to.as_deref() {
            Some(path) if !path.is_empty() => Some(expand_path(path)?),
            _ => None,
        };

        Ok(Self {
            import: ImportOptions {
                table_name: args.table_name.clone(),
                separator: resolve_separator(&args.dlm)?,
                has_header: args.header,
                primary_keys: resolve_primary_keys(&args.pk),
                duplicate_policy: DuplicatePolicy::resolve(&args.dup),
                verbose: args.verbose,
            },
            source,
            save_to,
            console: args.console,
            show_summary: args.showvar,
            commands: args.sql.clone(),
        })
    }

    /// Get the import settings
    pub fn import_options(&self) -> &ImportOptions {
        &self.import
    }

    /// Get the input source
    pub fn source(&self) -> &InputSource {
        &self.source
    }

    /// Get the path the store is persisted to, if any
    pub fn save_to(&self) -> Option<&PathBuf> {
        self.save_to.as_ref()
    }

    pub fn console(&self) -> bool {
        self.console
    }

    pub fn show_summary(&self) -> bool {
        self.show_summary
    }

    pub fn commands(&self) -> &str {
        &self.commands
    }

    /// Get the verbose flag
    pub fn verbose(&self) -> bool {
        self.import.verbose
    }
}
