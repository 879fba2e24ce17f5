//! Schema module for textsql
//!
//! Builds the target table from a header row and recovers the committed
//! schema from the store's catalog afterwards.
//!
//! - Column names are sanitized to `[A-Za-z0-9_]`; collisions after
//!   sanitization are left alone
//! - Every column is declared `TEXT`; no type is inferred from the data
//! - An optional composite primary key closes the table definition
//! - Creation uses `IF NOT EXISTS`, so an existing table is never altered

use std::borrow::Cow;

use regex::Regex;
use rusqlite::Connection;
use tracing::debug;

use crate::error::{TextSqlError, TextSqlResult};
use crate::query::value_text;

/// Characters that may not appear in a generated identifier
const UNSAFE_IDENTIFIER_CHARS: &str = "[^a-zA-Z0-9]";

/// Replaces identifier-unsafe characters in column names with `_`
pub struct ColumnSanitizer {
    pattern: Regex,
}

impl ColumnSanitizer {
    pub fn new() -> TextSqlResult<Self> {
        Ok(Self {
            pattern: Regex::new(UNSAFE_IDENTIFIER_CHARS)?,
        })
    }

    /// Sanitize one name; borrowed when nothing had to change
    pub fn sanitize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(name, "_")
    }
}

/// Column names `c0..c{count-1}` for input without a header row
pub fn synthesize_column_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("c{i}")).collect()
}

/// Build the `CREATE TABLE IF NOT EXISTS` statement for already-sanitized columns
pub fn create_table_sql(table_name: &str, columns: &[String], primary_keys: &[String]) -> String {
    let mut definitions: Vec<String> = columns.iter().map(|col| format!("{col} TEXT")).collect();
    if !primary_keys.is_empty() {
        definitions.push(format!("PRIMARY KEY({})", primary_keys.join(", ")));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        table_name,
        definitions.join(", ")
    )
}

/// Sanitize the header and create the table if it does not exist
///
/// # Arguments
/// * `conn` - Store connection
/// * `table_name` - Table to create, used verbatim
/// * `header` - Raw column names, in order
/// * `primary_keys` - Caller-declared key columns, used verbatim
///
/// # Returns
/// * `Ok(Vec<String>)` - The sanitized column names
/// * `Err` - If the header is empty or the store rejects the statement
pub fn create_table(
    conn: &Connection,
    table_name: &str,
    header: &[String],
    primary_keys: &[String],
) -> TextSqlResult<Vec<String>> {
    if header.is_empty() {
        return Err(TextSqlError::NoColumns(table_name.to_string()));
    }

    let sanitizer = ColumnSanitizer::new()?;
    let columns: Vec<String> = header
        .iter()
        .map(|raw| {
            let clean = sanitizer.sanitize(raw);
            if clean != raw.as_str() {
                debug!("Column {:?} renamed to {}", raw, clean);
            }
            clean.into_owned()
        })
        .collect();

    let sql = create_table_sql(table_name, &columns, primary_keys);
    debug!("{}", sql);
    conn.execute_batch(&sql)?;

    Ok(columns)
}

/// One column as recorded in the store's catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub ordinal_position: usize,
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub is_primary_key: bool,
}

/// Ordered column definitions of a table, as introspected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    fields: Vec<FieldDefinition>,
}

impl TableSchema {
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Whether the catalog flags any column as part of the primary key
    ///
    /// Best-effort only; the loader ORs this with the caller's key list.
    pub fn has_primary_key(&self) -> bool {
        self.fields.iter().any(|f| f.is_primary_key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read a table's column definitions from `pragma_table_info`
///
/// # Returns
/// * `Ok(TableSchema)` - Columns in declaration order
/// * `Err` - If the query fails or the table has no columns (does not exist)
pub fn fetch_table_schema(conn: &Connection, table_name: &str) -> TextSqlResult<TableSchema> {
    let mut stmt = conn.prepare(
        "SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1)",
    )?;

    let fields = stmt
        .query_map([table_name], |row| {
            let default_value = row.get_ref(4).map(|value| match value {
                rusqlite::types::ValueRef::Null => None,
                other => Some(value_text(other)),
            })?;
            Ok(FieldDefinition {
                ordinal_position: row.get::<_, i64>(0)? as usize,
                name: row.get(1)?,
                declared_type: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                default_value,
                is_primary_key: row.get::<_, i64>(5)? > 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if fields.is_empty() {
        return Err(TextSqlError::TableNotFound(table_name.to_string()));
    }

    Ok(TableSchema { fields })
}
