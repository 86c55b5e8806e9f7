//! JSON rendering of extracted text.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::LayoutMode;

use super::ExtractionStats;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// One page of extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// One-based page number
    pub number: u32,
    pub text: String,
}

/// Extracted text of a document, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub layout_mode: LayoutMode,
    /// Pages in the whole document, selected or not
    pub page_count: usize,
    pub pages: Vec<ExtractedPage>,
    pub stats: ExtractionStats,
}

impl ExtractedDocument {
    /// Build from `(page_number, text)` pairs as returned by
    /// [`Pdf::read_pages`](crate::Pdf::read_pages).
    pub fn new(layout_mode: LayoutMode, page_count: usize, pages: Vec<(u32, String)>) -> Self {
        let stats = ExtractionStats::from_pages(pages.iter().map(|(_, text)| text.as_str()));
        Self {
            layout_mode,
            page_count,
            pages: pages
                .into_iter()
                .map(|(number, text)| ExtractedPage { number, text })
                .collect(),
            stats,
        }
    }
}

/// Serialize any value to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
