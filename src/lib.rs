//! textsql library crate
//!
//! Loads delimited text into an embedded SQLite store and runs SQL against
//! it. The library provides:
//!
//! - Delimiter, primary-key and duplicate-policy resolution from raw strings
//! - Table creation from a header row with sanitized, text-typed columns
//! - A streaming, single-transaction loader that tolerates bad rows
//! - Schema introspection through the store's catalog
//! - Per-column summary statistics
//! - A query runner that renders result rows as comma-joined lines
//! - Store lifecycle (in-memory, persisted or temporary) and console hand-off

pub mod cli;
pub mod config;
pub mod console;
pub mod database;
pub mod error;
pub mod file_handler;
pub mod loader;
pub mod query;
pub mod resolver;
pub mod schema;
pub mod summary;
