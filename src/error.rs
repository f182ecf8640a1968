//! Error types for the payload inspector.
//!
//! Three layers of failure exist. [`InspectorError`] is returned by the
//! operations that can fail as a whole (enumerating formats, loading a
//! manifest). [`SourceError`] is produced by a [`crate::DataSource`] and is
//! isolated to a single format when it happens during retrieval.
//! [`PropertyError`] is isolated to a single property of an introspected
//! object.

use std::io;
use thiserror::Error;

/// Primary error type for the payload inspector.
#[derive(Debug, Error)]
pub enum InspectorError {
    /// The data source could not list its formats.
    #[error("Error analyzing {label}: {source}")]
    Enumeration {
        /// Label of the source that failed (e.g. "CLIPBOARD").
        label: String,
        /// The underlying source failure.
        #[source]
        source: SourceError,
    },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A payload manifest is structurally valid JSON but describes an
    /// impossible payload.
    #[error("Invalid manifest: {message}")]
    Manifest { message: String },

    /// The system clipboard could not be opened.
    #[error("Clipboard error: {message}")]
    Clipboard { message: String },
}

/// Result type alias for inspector operations.
pub type Result<T> = std::result::Result<T, InspectorError>;

/// Failure reported by a data source while listing formats or retrieving a
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SourceError {
    message: String,
}

impl SourceError {
    /// Create a source error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The requested format is not offered by the source.
    pub fn format_not_present(format: impl std::fmt::Display) -> Self {
        Self::new(format!("Format '{format}' is not present in the data source"))
    }

    /// The message carried by this error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for SourceError {
    fn from(err: io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Failure while reading one property of an introspected object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PropertyError {
    message: String,
}

impl PropertyError {
    /// Create a property error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The property does not exist on the object.
    pub fn missing(name: &str) -> Self {
        Self::new(format!("No property named '{name}'"))
    }
}
