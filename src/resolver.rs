//! Resolution of raw configuration strings into typed import settings
//!
//! The command line hands over three loosely formatted values: a delimiter
//! spec, a primary-key list and a duplicate-handling keyword. This module
//! turns each into the value the import pipeline consumes.

use std::fmt;

use crate::error::{TextSqlError, TextSqlResult};

/// Separator between entries of a primary-key list
const PRIMARY_KEY_SEPARATOR: char = ',';

/// Resolve a delimiter specification to the byte the reader splits on
///
/// Accepts the word `tab`, a `0x`-prefixed hex byte sequence (decoded to its
/// first code point), or a literal whose first character is used.
///
/// # Returns
/// * `Ok(u8)` - The delimiter byte
/// * `Err` - If the hex is malformed, nothing decodes, or the character is not ASCII
pub fn resolve_separator(spec: &str) -> TextSqlResult<u8> {
    let separator = if spec == "tab" {
        Some('\t')
    } else if let Some(digits) = spec.strip_prefix("0x") {
        let bytes = hex::decode(digits)?;
        first_code_point(&bytes)
    } else {
        spec.chars().next()
    };

    let separator = separator
        .ok_or_else(|| TextSqlError::InvalidDelimiter(format!("'{spec}' yields no character")))?;

    // The reader splits on a single byte, so multi-byte code points can't be honoured
    if !separator.is_ascii() {
        return Err(TextSqlError::InvalidDelimiter(format!(
            "'{spec}' resolves to non-ASCII character {separator:?}"
        )));
    }

    Ok(separator as u8)
}

/// First valid UTF-8 code point at the start of `bytes`, if any
fn first_code_point(bytes: &[u8]) -> Option<char> {
    let valid = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
    };
    valid.chars().next()
}

/// Split a primary-key list into column names
///
/// Tokens are trimmed and empty ones dropped. Order and duplicates are kept
/// as given.
pub fn resolve_primary_keys(spec: &str) -> Vec<String> {
    spec.split(PRIMARY_KEY_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Conflict-resolution strategy for records whose primary key already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Delete the existing row and insert the new one
    Replace,
    /// Roll back the whole import transaction
    Rollback,
    /// Undo the conflicting statement and skip the record
    Abort,
    /// Stop the conflicting statement and skip the record
    Fail,
    /// Keep the existing row and drop the new one
    Ignore,
    /// No conflict clause; the store's default constraint behaviour applies
    #[default]
    None,
}

impl DuplicatePolicy {
    /// Resolve a keyword case-insensitively; unknown or empty input is `None`
    pub fn resolve(keyword: &str) -> Self {
        match keyword.trim().to_lowercase().as_str() {
            "replace" => DuplicatePolicy::Replace,
            "rollback" => DuplicatePolicy::Rollback,
            "abort" => DuplicatePolicy::Abort,
            "fail" => DuplicatePolicy::Fail,
            "ignore" => DuplicatePolicy::Ignore,
            _ => DuplicatePolicy::None,
        }
    }

    /// The keyword placed after `INSERT OR`, if this policy emits one
    pub fn conflict_clause(&self) -> Option<&'static str> {
        match self {
            DuplicatePolicy::Replace => Some("REPLACE"),
            DuplicatePolicy::Rollback => Some("ROLLBACK"),
            DuplicatePolicy::Abort => Some("ABORT"),
            DuplicatePolicy::Fail => Some("FAIL"),
            DuplicatePolicy::Ignore => Some("IGNORE"),
            DuplicatePolicy::None => None,
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.conflict_clause() {
            Some(clause) => write!(f, "{}", clause.to_lowercase()),
            None => write!(f, "none"),
        }
    }
}
