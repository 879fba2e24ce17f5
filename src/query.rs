//! Query runner for textsql
//!
//! Splits a `;`-separated command string and executes each statement
//! directly against the store, in order, outside any transaction. Result rows
//! are written as raw values joined by `, `, one row per line, with no
//! header and no quoting.

use std::borrow::Cow;
use std::io::Write;

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::debug;

use crate::error::TextSqlResult;

/// Separator between rendered values of a result row
const VALUE_SEPARATOR: &[u8] = b", ";

/// Split a command string on `;`, dropping blank fragments
pub fn split_commands(commands: &str) -> Vec<&str> {
    commands
        .split(';')
        .map(str::trim)
        .filter(|sql| !sql.is_empty())
        .collect()
}

/// Raw bytes of a value: text and blobs as stored, numbers as decimal text, NULL as nothing
pub fn value_bytes(value: ValueRef<'_>) -> Cow<'_, [u8]> {
    match value {
        ValueRef::Null => Cow::Borrowed(&[]),
        ValueRef::Integer(i) => Cow::Owned(i.to_string().into_bytes()),
        ValueRef::Real(f) => Cow::Owned(f.to_string().into_bytes()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Cow::Borrowed(bytes),
    }
}

/// Value rendered as a string, replacing invalid UTF-8
pub fn value_text(value: ValueRef<'_>) -> String {
    String::from_utf8_lossy(&value_bytes(value)).into_owned()
}

/// Execute one statement and write its result rows
///
/// # Returns
/// * `Ok(usize)` - Number of rows written
/// * `Err` - If preparing or stepping the statement fails, or output fails
pub fn run_statement<W: Write>(conn: &Connection, sql: &str, out: &mut W) -> TextSqlResult<usize> {
    let mut stmt = conn.prepare(sql)?;
    let column_count = stmt.column_count();
    let mut rows = stmt.query([])?;

    let mut written = 0;
    while let Some(row) = rows.next()? {
        for i in 0..column_count {
            if i > 0 {
                out.write_all(VALUE_SEPARATOR)?;
            }
            out.write_all(&value_bytes(row.get_ref(i)?))?;
        }
        out.write_all(b"\n")?;
        written += 1;
    }

    Ok(written)
}

/// Run every statement of a command string in order
///
/// Stops at the first failing statement; earlier statements stay applied.
///
/// # Returns
/// * `Ok(usize)` - Number of statements executed
/// * `Err` - The first execution or output error
pub fn run_queries<W: Write>(
    conn: &Connection,
    commands: &str,
    out: &mut W,
) -> TextSqlResult<usize> {
    let statements = split_commands(commands);
    for sql in &statements {
        debug!("Executing SQL: {}", sql);
        let rows = run_statement(conn, sql, out)?;
        debug!("Query returned {} rows", rows);
    }
    out.flush()?;
    Ok(statements.len())
}
