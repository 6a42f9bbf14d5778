//! Error types for dlgcsv-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dlgcsv-core
///
/// The permissive [`crate::codec::parse`] never produces one of these;
/// only strict parsing and the file-level helpers do.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input ended inside a quoted field (strict mode only)
    #[error("unterminated quoted field starting at line {line}, column {column}")]
    MalformedQuoting { line: usize, column: usize },

    /// A language name that is not one of the supported languages
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// A scan root does not exist
    #[error("scan root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
