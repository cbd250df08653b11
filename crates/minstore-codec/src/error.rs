//! Encoder error type.

use std::io;

/// Errors that can occur while encoding a response body.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
