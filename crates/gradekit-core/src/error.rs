//! Definition-file error types.
//!
//! Grading itself has no error paths; these errors only occur when
//! loading quiz, answer, or rule definition files from disk, so callers
//! can report which file was unreadable without string matching.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading a definition file.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
