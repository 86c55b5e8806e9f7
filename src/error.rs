//! Error types for pdftotext.

use std::io;
use thiserror::Error;

/// Result type alias for pdftotext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while opening a document or extracting text.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The buffer is not a well-formed PDF document.
    #[error("PDF parsing error: {0}")]
    Parse(String),

    /// The document is encrypted and the password did not unlock it.
    #[error("failed to unlock document")]
    Unlock,

    /// A single page could not be decoded.
    #[error("failed to read page {page}: {reason}")]
    PageRead {
        /// Zero-based page index
        page: usize,
        /// What went wrong in the collaborator
        reason: String,
    },

    /// Page index outside `[0, page_count)`.
    #[error("page index {index} is out of range (document has {count} pages)")]
    IndexOutOfRange { index: usize, count: usize },

    /// The document was closed before the read.
    #[error("document is closed")]
    DocumentClosed,

    /// Invalid page selection string.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error while rendering output (JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build a [`Error::PageRead`] for the given page.
    pub fn page_read(page: usize, reason: impl Into<String>) -> Self {
        Error::PageRead {
            page,
            reason: reason.into(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Unlock,
            _ => Error::Parse(err.to_string()),
        }
    }
}
