//! textsql - load delimited text into SQLite and query it with SQL
//!
//! # Program Flow
//!
//! 1. Parse command-line arguments and resolve them into an `AppConfig`
//! 2. Open the store (in memory, at `--save-to`, or in a temp dir for `--console`)
//! 3. Stream the input into the target table inside one transaction
//! 4. Optionally print the per-column summary to stderr
//! 5. Run the `--sql` statements, printing result rows to stdout
//! 6. Close the store and optionally hand it to the sqlite3 shell
//!
//! Every stage returns an error instead of exiting; `main` attaches context
//! and lets anyhow report it with a non-zero exit code.

use std::io::{self, BufWriter, IsTerminal};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use textsql::cli;
use textsql::config::AppConfig;
use textsql::console;
use textsql::database::Store;
use textsql::loader::import_delimited;
use textsql::query::run_queries;
use textsql::summary::{summarize_table, write_report};

/// Send diagnostics to stderr; `--verbose` opens up everything down to debug
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

fn main() -> Result<()> {
    let args = cli::parse_args()?;
    init_tracing(args.verbose);
    debug!("Arguments: {args:?}");

    let config = AppConfig::from_args(&args).context("Invalid configuration")?;
    let import = config.import_options();

    let mut store = Store::open(config.save_to().map(|p| p.as_path()), config.console())
        .context("Failed to open database")?;

    let input = config
        .source()
        .open()
        .context("Failed to open input source")?;
    let report = import_delimited(store.connection_mut(), input, import)
        .with_context(|| format!("Failed to import into table {}", import.table_name))?;

    info!(
        "rows: {} + {} ==> {} ({:?})",
        report.count_before, report.records_read, report.count_after, report.elapsed
    );
    if report.insert_failures + report.parse_failures > 0 {
        info!(
            "skipped {} rejected and {} unparseable records",
            report.insert_failures, report.parse_failures
        );
    }

    if config.show_summary() {
        let summaries = summarize_table(store.connection(), &import.table_name, &report.schema)
            .context("Failed to summarize table")?;
        write_report(&mut io::stderr().lock(), &summaries)?;
    }

    let started = Instant::now();
    let mut out = BufWriter::new(io::stdout().lock());
    let executed = run_queries(store.connection(), config.commands(), &mut out)
        .context("Failed to execute SQL")?;
    drop(out);
    info!("{} queries run in: {:?}", executed, started.elapsed());

    // The connection must be closed before another process opens the file
    let closed = store.close().context("Failed to close database")?;
    if config.console() {
        if let Some(path) = closed.path() {
            console::launch(path).context("Failed to run console")?;
        }
    }

    Ok(())
}
