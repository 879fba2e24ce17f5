//! Test helpers for textsql integration tests
//!
//! This module provides helper functions and structs to simplify
//! writing end-to-end tests against the textsql binary.

#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Represents one invocation of textsql and what it should produce
pub struct TextSqlTestCase {
    /// Command line arguments
    pub args: Vec<String>,
    /// Data piped to stdin (when reading from `--source stdin`)
    pub stdin: Option<String>,
    /// Exact expected stdout, if it should be checked in full
    pub exact_stdout: Option<String>,
    /// Expected strings in stdout
    pub expected_stdout: Vec<String>,
    /// Expected strings in stderr
    pub expected_stderr: Vec<String>,
    /// Whether the command is expected to succeed
    pub should_succeed: bool,
}

impl Default for TextSqlTestCase {
    fn default() -> Self {
        TextSqlTestCase {
            args: Vec::new(),
            stdin: None,
            exact_stdout: None,
            expected_stdout: Vec::new(),
            expected_stderr: Vec::new(),
            should_succeed: true,
        }
    }
}

/// Build owned arguments from string slices
pub fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// Run textsql for a test case and check its expectations
pub fn run_test_case(test_case: TextSqlTestCase) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("textsql")?;
    cmd.args(&test_case.args);
    cmd.env_remove("RUST_LOG");

    let mut assert = match test_case.stdin {
        Some(input) => cmd.write_stdin(input).assert(),
        None => cmd.assert(),
    };

    if test_case.should_succeed {
        assert = assert.success();
    } else {
        assert = assert.failure();
    }

    if let Some(exact) = test_case.exact_stdout {
        assert = assert.stdout(exact);
    }
    for expected in test_case.expected_stdout {
        assert = assert.stdout(predicate::str::contains(expected));
    }
    for expected in test_case.expected_stderr {
        assert = assert.stderr(predicate::str::contains(expected));
    }

    Ok(())
}

/// Helper function to create a temp directory for tests, respecting CARGO_TARGET_TMPDIR if set
pub fn create_temp_dir() -> Result<TempDir, Box<dyn std::error::Error>> {
    if let Ok(cargo_target_tmpdir) = env::var("CARGO_TARGET_TMPDIR") {
        fs::create_dir_all(&cargo_target_tmpdir)?;
        Ok(TempDir::new_in(cargo_target_tmpdir)?)
    } else {
        Ok(TempDir::new()?)
    }
}

/// Helper function to create an input file with custom data
pub fn create_custom_file(
    dir: &Path,
    filename: &str,
    content: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Helper function to create the standard people CSV with a header row
pub fn prepare_people_file(dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    create_custom_file(
        dir,
        "people.csv",
        "id,name,age\n1,Alice,30\n2,Bob,25\n3,Charlie,35\n",
    )
}
