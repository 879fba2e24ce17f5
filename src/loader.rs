//! Streaming import of delimited text into the store
//!
//! The whole load runs inside one transaction with one prepared `INSERT`
//! that is bound once per record. Fields are bound as TEXT byte for byte,
//! so input that is not valid UTF-8 is stored unchanged. Records are read
//! one at a time; a record
//! that fails to parse or insert is logged and skipped without aborting the
//! batch. Two conflicts end the import instead:
//!
//! - a duplicate key while no duplicate policy was requested
//! - policy `rollback` firing, which leaves no transaction to commit
//!
//! `count(*)` snapshots before and after the load bracket the run for the
//! report.

use std::io::Read;
use std::time::{Duration, Instant};

use csv::ByteRecord;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ErrorCode, Statement, ToSql};
use tracing::{debug, warn};

use crate::config::ImportOptions;
use crate::error::{TextSqlError, TextSqlResult};
use crate::resolver::DuplicatePolicy;
use crate::schema::{create_table, fetch_table_schema, synthesize_column_names, TableSchema};

/// Records between progress markers in verbose mode
pub const PROGRESS_BATCH: usize = 10_000;

/// Outcome of one import run
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Schema of the target table as the store reports it
    pub schema: TableSchema,
    /// Rows in the table before the load
    pub count_before: i64,
    /// Rows in the table after the commit
    pub count_after: i64,
    /// Records parsed from the input, excluding the header
    pub records_read: usize,
    /// Records whose insert succeeded
    pub rows_loaded: usize,
    /// Records rejected by the store
    pub insert_failures: usize,
    /// Records the reader could not parse
    pub parse_failures: usize,
    pub elapsed: Duration,
}

/// Build the reusable insert statement
///
/// The conflict clause is only emitted when a policy is set and the table
/// has a primary key.
pub fn insert_sql(
    table_name: &str,
    column_count: usize,
    policy: DuplicatePolicy,
    has_primary_key: bool,
) -> String {
    let placeholders = vec!["?"; column_count].join(", ");
    match policy.conflict_clause() {
        Some(clause) if has_primary_key => {
            format!("INSERT OR {clause} INTO {table_name} VALUES ({placeholders});")
        }
        _ => format!("INSERT INTO {table_name} VALUES ({placeholders});"),
    }
}

/// Count every row of a table
pub fn count_rows(conn: &Connection, table_name: &str) -> TextSqlResult<i64> {
    let count = conn.query_row(&format!("SELECT count(*) FROM {table_name}"), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}

/// A field bound as TEXT without UTF-8 validation
struct RawText<'a>(&'a [u8]);

impl ToSql for RawText<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(ValueRef::Text(self.0)))
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}

/// Binds records to the prepared insert for the life of one transaction
struct RowLoader<'conn> {
    conn: &'conn Connection,
    insert: Statement<'conn>,
    policy: DuplicatePolicy,
    has_primary_key: bool,
    verbose: bool,
    records_read: usize,
    rows_loaded: usize,
    insert_failures: usize,
}

impl<'conn> RowLoader<'conn> {
    fn new(
        conn: &'conn Connection,
        table_name: &str,
        schema: &TableSchema,
        options: &ImportOptions,
    ) -> TextSqlResult<Self> {
        // The catalog's key flag is not trusted alone; a declared key list also counts
        let has_primary_key = schema.has_primary_key() || !options.primary_keys.is_empty();
        let sql = insert_sql(
            table_name,
            schema.len(),
            options.duplicate_policy,
            has_primary_key,
        );
        debug!("{}", sql);

        Ok(Self {
            conn,
            insert: conn.prepare(&sql)?,
            policy: options.duplicate_policy,
            has_primary_key,
            verbose: options.verbose,
            records_read: 0,
            rows_loaded: 0,
            insert_failures: 0,
        })
    }

    /// Insert one record; only structural failures are returned
    fn load(&mut self, record: &ByteRecord) -> TextSqlResult<()> {
        self.records_read += 1;
        let record_number = self.records_read;

        match self.insert.execute(params_from_iter(record.iter().map(RawText))) {
            Ok(_) => self.rows_loaded += 1,
            Err(err) => {
                if self.conn.is_autocommit() {
                    return Err(TextSqlError::ImportRolledBack(record_number));
                }
                if self.policy == DuplicatePolicy::None
                    && self.has_primary_key
                    && is_constraint_violation(&err)
                {
                    return Err(TextSqlError::DuplicateKey {
                        record: record_number,
                        source: err,
                    });
                }
                self.insert_failures += 1;
                warn!("Bad row {}: {}", record_number, err);
            }
        }

        if self.verbose && record_number % PROGRESS_BATCH == 0 {
            eprint!(".");
        }
        Ok(())
    }
}

/// Import delimited text from `input` into the table named in `options`
///
/// Creates the table if needed, then loads every record inside a single
/// transaction that is committed once at the end.
///
/// # Returns
/// * `Ok(LoadReport)` - Counts and timing for the run
/// * `Err` - On any structural failure; nothing from this run is committed
pub fn import_delimited<R: Read>(
    conn: &mut Connection,
    input: R,
    options: &ImportOptions,
) -> TextSqlResult<LoadReport> {
    let table_name = options.table_name.as_str();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.separator)
        .from_reader(input);

    let mut record = ByteRecord::new();
    if !reader.read_byte_record(&mut record)? {
        return Err(TextSqlError::EmptyInput);
    }

    let (header, first_row) = if options.has_header {
        let header: Vec<String> = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        let mut first = ByteRecord::new();
        let has_row = reader.read_byte_record(&mut first)?;
        (header, has_row.then_some(first))
    } else {
        (synthesize_column_names(record.len()), Some(record.clone()))
    };

    create_table(conn, table_name, &header, &options.primary_keys)?;

    let started = Instant::now();
    let count_before = count_rows(conn, table_name)?;

    let tx = conn.transaction()?;
    let schema = fetch_table_schema(&tx, table_name)?;
    let mut parse_failures = 0;

    let mut loader = RowLoader::new(&tx, table_name, &schema, options)?;
    if let Some(row) = first_row {
        loader.load(&row)?;
    }
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => loader.load(&record)?,
            // A broken stream cannot be read past, so skipping would loop forever
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                parse_failures += 1;
                warn!("Bad record: {}", e);
            }
        }
    }
    if options.verbose && loader.records_read >= PROGRESS_BATCH {
        eprintln!();
    }

    let records_read = loader.records_read;
    let rows_loaded = loader.rows_loaded;
    let insert_failures = loader.insert_failures;
    drop(loader);
    tx.commit()?;

    let count_after = count_rows(conn, table_name)?;

    Ok(LoadReport {
        schema,
        count_before,
        count_after,
        records_read,
        rows_loaded,
        insert_failures,
        parse_failures,
        elapsed: started.elapsed(),
    })
}
