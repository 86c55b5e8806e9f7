//! Glyph runs.

use serde::{Deserialize, Serialize};

use super::{Point, Rect};

/// A maximal run of decoded text sharing one baseline and font context.
///
/// Runs are immutable once produced; the text may carry separators (spaces,
/// line breaks) that the producer inserted to reflect the content stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRun {
    text: String,
    origin: Point,
    bounding_box: Rect,
}

impl GlyphRun {
    /// Create a run. `text` is expected to be non-empty; empty runs are
    /// dropped by [`PageContent::new`](super::PageContent::new).
    pub fn new(text: impl Into<String>, origin: Point, bounding_box: Rect) -> Self {
        Self {
            text: text.into(),
            origin,
            bounding_box,
        }
    }

    /// The decoded text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Baseline origin of the first glyph.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Bounding box of all glyphs in the run.
    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    /// Number of characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Average advance per character, falling back to half the run height
    /// when the box carries no usable width.
    pub fn avg_char_width(&self) -> f32 {
        let chars = self.char_count();
        let width = self.bounding_box.width();
        if chars > 0 && width.is_finite() && width > 0.0 {
            width / chars as f32
        } else {
            self.bounding_box.height().abs() * 0.5
        }
    }
}
