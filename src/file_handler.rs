//! Input handling module for textsql
//!
//! Opens the delimited-text source (a file or standard input) and normalizes
//! user-supplied paths: a leading `~/` is expanded against `$HOME`, relative
//! paths are made absolute, and `.`/`..` components are folded away.

use std::env;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

use crate::error::TextSqlResult;

/// Source spec that selects standard input
pub const STDIN_SOURCE: &str = "stdin";

/// Where the delimited text is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Interpret a `--source` value: `stdin` or a file path
    pub fn from_spec(spec: &str) -> TextSqlResult<Self> {
        if spec == STDIN_SOURCE {
            Ok(InputSource::Stdin)
        } else {
            Ok(InputSource::File(expand_path(spec)?))
        }
    }

    /// Open the source for buffered reading
    ///
    /// # Returns
    /// * `Ok(Box<dyn Read>)` - A reader positioned at the start of the input
    /// * `Err` - If the file can't be opened
    pub fn open(&self) -> TextSqlResult<Box<dyn Read>> {
        match self {
            InputSource::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
            InputSource::File(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        }
    }
}

/// Expand `~/`, make the path absolute and clean it lexically
pub fn expand_path(path: &str) -> TextSqlResult<PathBuf> {
    let expanded = match (path.strip_prefix("~/"), env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        env::current_dir()?.join(expanded)
    };

    Ok(clean_path(&absolute))
}

/// Fold `.` and `..` components without touching the filesystem
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}
