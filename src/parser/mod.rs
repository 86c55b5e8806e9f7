//! PDF parsing module.
//!
//! Everything that touches the PDF object model lives here: the
//! [`PdfBackend`] seam, the content stream interpreter, and the lopdf-backed
//! implementation.

mod backend;
mod content;
mod lopdf_backend;
mod options;
mod security;

pub use backend::{decode_text_simple, get_number_from_value, ContentOp, PdfBackend, PdfValue};
pub(crate) use backend::page_error;
pub use content::{ContentInterpreter, FontSource, GlyphCode, Matrix, DEFAULT_GLYPH_WIDTH};
pub use lopdf_backend::LopdfBackend;
pub use options::{ErrorMode, ExtractOptions};
