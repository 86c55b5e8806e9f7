//! Rendering module for extracted text: page selection, plain text and JSON.

mod json;
mod options;
mod result;
mod text;

pub use json::{to_json, ExtractedDocument, ExtractedPage, JsonFormat};
pub use options::PageSelection;
pub use result::ExtractionStats;
pub use text::to_text;
