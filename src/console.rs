//! Hand-off to the interactive `sqlite3` shell
//!
//! Runs after the store has been closed, with the shell inheriting the
//! terminal's stdin, stdout and stderr.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{TextSqlError, TextSqlResult};

/// Shell binary used for interactive access
pub const CONSOLE_PROGRAM: &str = "sqlite3";

/// Run `program <db_path>` and wait for it to exit
pub fn launch_with(program: &str, db_path: &Path) -> TextSqlResult<()> {
    debug!("Opening console: {} {}", program, db_path.display());
    let status = Command::new(program)
        .arg(db_path)
        .status()
        .map_err(|e| TextSqlError::ConsoleFailed(format!("{program}: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(TextSqlError::ConsoleFailed(format!("{program} exited with {status}")))
    }
}

/// Open the sqlite3 shell on a database file
pub fn launch(db_path: &Path) -> TextSqlResult<()> {
    launch_with(CONSOLE_PROGRAM, db_path)
}
