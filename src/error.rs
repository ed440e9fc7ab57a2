//! Load-time failures surfaced by the source reader, normalizer and loader.
//!
//! Query operations never fail; an empty view is a valid result.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source {path:?} is unavailable: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },
    #[error("required column(s) missing after header cleanup: {}", missing.join(", "))]
    SchemaError { missing: Vec<String> },
    #[error("row {row}: column '{column}' has malformed value '{value}' (expected YYYY-YYYY)")]
    RowParseError {
        row: usize,
        column: String,
        value: String,
    },
}

impl LoadError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LoadError::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
