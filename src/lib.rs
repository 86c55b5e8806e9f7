//! # pdftotext
//!
//! Page text extraction for PDF documents.
//!
//! Each page is decoded into positioned glyph runs, then turned into one
//! string, either in reading order rebuilt from geometry
//! ([`LayoutMode::Physical`]) or in content stream order
//! ([`LayoutMode::Raw`]). Whole-document text joins pages with a blank line.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftotext::Pdf;
//!
//! fn main() -> pdftotext::Result<()> {
//!     let data = std::fs::read("document.pdf")?;
//!     let pdf = Pdf::open(&data, None)?;
//!
//!     println!("{} pages", pdf.page_count());
//!     println!("{}", pdf.read_page(0)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Physical layout**: lines grouped by baseline, runs ordered left to right
//! - **Raw layout**: text exactly in content stream order
//! - **Encrypted documents**: user or owner password
//! - **Pluggable parsing**: any [`PdfBackend`] can feed the layout engine
//! - **Parallel extraction**: uses Rayon for multi-page documents
//! - **CJK support**: no spurious spaces between ideographs

pub mod detect;
pub mod document;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, is_pdf_bytes, PdfFormat};
pub use document::{Pages, Pdf, PAGE_SEPARATOR};
pub use error::{Error, Result};
pub use layout::LayoutConfig;
pub use model::{GlyphRun, LayoutMode, PageContent, Point, Rect};
pub use parser::{ErrorMode, ExtractOptions, LopdfBackend, PdfBackend};
pub use render::{ExtractedDocument, ExtractionStats, JsonFormat, PageSelection};

use std::path::Path;

/// Extract the text of every page of a PDF file, physical layout.
///
/// # Example
///
/// ```no_run
/// use pdftotext::extract_text;
///
/// let text = extract_text("document.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    extract_text_with_options(path, ExtractOptions::default())
}

/// Extract the text of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdftotext::{extract_text_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new()
///     .raw()
///     .with_password("secret")
///     .lenient();
/// let text = extract_text_with_options("encrypted.pdf", options).unwrap();
/// ```
pub fn extract_text_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<String> {
    let path = path.as_ref();
    log::debug!("extracting {}", path.display());
    let data = std::fs::read(path)?;
    Pdf::open_with_options(&data, options)?.read_all()
}

/// Extract the text of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdftotext::extract_text_bytes;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let text = extract_text_bytes(&data).unwrap();
/// ```
pub fn extract_text_bytes(data: &[u8]) -> Result<String> {
    Pdf::open(data, None)?.read_all()
}
