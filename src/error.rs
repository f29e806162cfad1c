//! Error types for sectionize library.

use std::io;
use thiserror::Error;

/// Result type alias for sectionize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while inferring document structure.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A fragment dump could not be decoded.
    #[error("Fragment dump error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no usable first block, so the header cannot be extracted.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
