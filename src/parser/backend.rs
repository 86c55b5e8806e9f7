//! PDF backend abstraction layer.
//!
//! The document extractor talks to the PDF object model only through
//! [`PdfBackend`]: load bytes, unlock, count pages, and produce one page's
//! decoded [`PageContent`]. The concrete library (lopdf) stays behind
//! [`LopdfBackend`](super::LopdfBackend).

use crate::error::{Error, Result};
use crate::model::PageContent;

/// Abstract interface to the PDF container and font decoding layer.
///
/// Implementations that are `Sync` promise re-entrant per-page decoding,
/// which is what parallel extraction relies on.
pub trait PdfBackend: Sized {
    /// Parse a document from bytes. Fails with [`Error::Parse`] on input
    /// that is not a well-formed document.
    fn load(data: &[u8]) -> Result<Self>;

    /// Whether the document still needs a password.
    fn is_encrypted(&self) -> bool;

    /// Unlock with a user or owner password. A no-op for documents that are
    /// not encrypted; fails with [`Error::Unlock`] otherwise.
    fn unlock(&mut self, password: &str) -> Result<()>;

    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Decode one page (zero-based). Fails with [`Error::PageRead`].
    fn page_content(&self, index: usize) -> Result<PageContent>;
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    /// Numeric operand at `index`, if present.
    pub fn number(&self, index: usize) -> Option<f32> {
        self.operands.get(index).and_then(get_number_from_value)
    }
}

/// Decoding used when a font carries no usable encoding.
///
/// UTF-16BE when the string starts with a BOM, otherwise one byte per
/// character as Latin-1. Content strings are never UTF-8, so bytes that
/// happen to form valid UTF-8 still decode one by one. Malformed UTF-16 is
/// an error rather than replacement characters.
pub fn decode_text_simple(bytes: &[u8]) -> std::result::Result<String, String> {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        if bytes.len() % 2 != 0 {
            return Err("odd-length UTF-16 string".to_string());
        }
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).map_err(|e| format!("invalid UTF-16 text: {}", e));
    }

    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}

/// Map a collaborator failure on `page` to [`Error::PageRead`], keeping
/// errors that already name a page.
pub(crate) fn page_error(page: usize, err: Error) -> Error {
    match err {
        Error::PageRead { .. } => err,
        other => Error::page_read(page, other.to_string()),
    }
}
