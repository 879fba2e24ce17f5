//! Per-column statistics over a loaded table
//!
//! One aggregate query per column computes text length bounds, distinct
//! count and min/max value using the store's own comparison rules. The
//! results are ephemeral and only feed the summary report.

use std::io::Write;

use rusqlite::Connection;

use crate::error::TextSqlResult;
use crate::query::value_text;
use crate::schema::TableSchema;

/// Header line of the summary report
pub const REPORT_HEADER: &str = "Field\tMin.Length\tMax.Length\tDistinct\tMin.Value\tMax.Value";

/// Statistics for one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSummary {
    pub column_name: String,
    pub min_length: i64,
    pub max_length: i64,
    pub distinct_count: i64,
    pub min_value: String,
    pub max_value: String,
}

/// Summarize one column of a table
///
/// Aggregates over an empty table come back NULL; they are reported as `0`
/// and the empty string.
pub fn summarize_field(
    conn: &Connection,
    table_name: &str,
    column: &str,
) -> TextSqlResult<FieldSummary> {
    let sql = format!(
        "SELECT min(length({column})), max(length({column})), count(DISTINCT {column}), \
         min({column}), max({column}) FROM {table_name}"
    );
    let summary = conn.query_row(&sql, [], |row| {
        Ok(FieldSummary {
            column_name: column.to_string(),
            min_length: row.get::<_, Option<i64>>(0)?.unwrap_or(0),
            max_length: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
            distinct_count: row.get(2)?,
            min_value: value_text(row.get_ref(3)?),
            max_value: value_text(row.get_ref(4)?),
        })
    })?;
    Ok(summary)
}

/// Summarize every column, in schema order
pub fn summarize_table(
    conn: &Connection,
    table_name: &str,
    schema: &TableSchema,
) -> TextSqlResult<Vec<FieldSummary>> {
    schema
        .fields()
        .iter()
        .map(|field| summarize_field(conn, table_name, &field.name))
        .collect()
}

/// Write the tab-separated report: header, one line per column, blank line
pub fn write_report<W: Write>(out: &mut W, summaries: &[FieldSummary]) -> TextSqlResult<()> {
    writeln!(out)?;
    writeln!(out, "{REPORT_HEADER}")?;
    for s in summaries {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            s.column_name, s.min_length, s.max_length, s.distinct_count, s.min_value, s.max_value
        )?;
    }
    writeln!(out)?;
    Ok(())
}
