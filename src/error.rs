//! Error types for the conversion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a conversion run.
///
/// Unresolvable references inside a well-formed model are not errors; the
/// extractor and mapper log them and carry on with fewer facts.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed markup in the input document.
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid configuration file contents.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON serialization error (store dump).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a read error for `path`.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for `path`.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
