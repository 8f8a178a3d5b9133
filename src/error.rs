//! Error types for pdflens library.

use std::io;
use thiserror::Error;

/// Result type alias for pdflens operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while driving a viewer session.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport-level HTTP failure (connection refused, TLS, body read).
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message reported by the backend
        message: String,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Only PDF files can be submitted for analysis.
    #[error("Unsupported file: {0} (only PDF files are allowed)")]
    UnsupportedFile(String),

    /// An operation needed a loaded document but none is open.
    #[error("No document loaded")]
    NoDocument,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The rendering engine failed to load or render a page.
    #[error("Rendering engine error: {0}")]
    Engine(String),
}

impl Error {
    /// Build an [`Error::Api`] from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }
}
