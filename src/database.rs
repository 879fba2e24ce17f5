//! Store lifecycle for textsql
//!
//! The store is a single SQLite connection owned by the process for the
//! whole run. It lives in memory unless a destination path is given or a
//! file is needed for the console hand-off, in which case a fresh temporary
//! directory holds it. Temporary directories are removed when the last
//! handle referring to them is dropped.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;
use tracing::debug;

use crate::error::{TextSqlError, TextSqlResult};

/// File name of the database inside a temporary directory
const TEMP_DB_NAME: &str = "textsql.db";

/// Open connection plus whatever backs it on disk
pub struct Store {
    conn: Connection,
    /// On-disk location, `None` for in-memory stores
    path: Option<PathBuf>,
    temp_dir: Option<TempDir>,
}

/// What remains of a store after its connection is closed
///
/// Keeps a temporary directory alive so the file can still be handed to an
/// external tool; dropping this removes it.
#[derive(Debug)]
pub struct ClosedStore {
    path: Option<PathBuf>,
    temp_dir: Option<TempDir>,
}

impl ClosedStore {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the file disappears when this value is dropped
    pub fn is_temporary(&self) -> bool {
        self.temp_dir.is_some()
    }
}

impl Store {
    /// Open the store
    ///
    /// # Arguments
    /// * `save_to` - Persist the database at this path
    /// * `needs_file` - Back the store with a temporary file when no path is given
    pub fn open(save_to: Option<&Path>, needs_file: bool) -> TextSqlResult<Self> {
        match save_to {
            Some(path) => Self::open_file(path),
            None if needs_file => Self::open_temporary(),
            None => Self::open_in_memory(),
        }
    }

    pub fn open_in_memory() -> TextSqlResult<Self> {
        debug!("Opening in-memory store");
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: None,
            temp_dir: None,
        })
    }

    pub fn open_file(path: &Path) -> TextSqlResult<Self> {
        debug!("Opening store at {}", path.display());
        Ok(Self {
            conn: Connection::open(path)?,
            path: Some(path.to_path_buf()),
            temp_dir: None,
        })
    }

    /// Open a file-backed store in a new temporary directory
    pub fn open_temporary() -> TextSqlResult<Self> {
        let temp_dir = tempfile::Builder::new().prefix("textsql").tempdir()?;
        let path = temp_dir.path().join(TEMP_DB_NAME);
        debug!("Opening temporary store at {}", path.display());
        Ok(Self {
            conn: Connection::open(&path)?,
            path: Some(path),
            temp_dir: Some(temp_dir),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the connection, reporting any failure to do so
    pub fn close(self) -> TextSqlResult<ClosedStore> {
        let Store {
            conn,
            path,
            temp_dir,
        } = self;
        conn.close().map_err(|(_, e)| TextSqlError::SqliteError(e))?;
        Ok(ClosedStore { path, temp_dir })
    }
}
