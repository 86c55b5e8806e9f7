//! Page-level types.

use serde::{Deserialize, Serialize};

use super::{GlyphRun, Rect};

/// How page text is ordered on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Reading order reconstructed from glyph positions
    #[default]
    Physical,
    /// Order of appearance in the page's content stream
    Raw,
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutMode::Physical => f.write_str("physical"),
            LayoutMode::Raw => f.write_str("raw"),
        }
    }
}

/// Decoded text content of one page.
///
/// Created per extraction call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    page_rect: Rect,
    runs: Vec<GlyphRun>,
}

impl PageContent {
    /// Create page content; runs with empty text are dropped.
    pub fn new(page_rect: Rect, runs: Vec<GlyphRun>) -> Self {
        let runs = runs.into_iter().filter(|r| !r.text().is_empty()).collect();
        Self { page_rect, runs }
    }

    /// A page without any text.
    pub fn empty(page_rect: Rect) -> Self {
        Self {
            page_rect,
            runs: Vec::new(),
        }
    }

    /// Page bounding box as reported by the producer (possibly degenerate).
    pub fn page_rect(&self) -> Rect {
        self.page_rect
    }

    /// Runs in raw (content stream) order.
    pub fn runs(&self) -> &[GlyphRun] {
        &self.runs
    }

    /// Check if the page has no text runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    #[test]
    fn test_empty_runs_are_dropped() {
        let page = PageContent::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            vec![
                GlyphRun::new("", Point::default(), Rect::default()),
                GlyphRun::new("a", Point::default(), Rect::default()),
            ],
        );
        assert_eq!(page.runs().len(), 1);
        assert!(!page.is_empty());
        assert!(PageContent::empty(Rect::default()).is_empty());
    }

    #[test]
    fn test_layout_mode_serde() {
        assert_eq!(LayoutMode::default(), LayoutMode::Physical);
        assert_eq!(serde_json::to_string(&LayoutMode::Raw).unwrap(), "\"raw\"");
        assert_eq!(LayoutMode::Physical.to_string(), "physical");
    }
}
