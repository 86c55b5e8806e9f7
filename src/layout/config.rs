//! Tunables for physical layout reconstruction.

use serde::{Deserialize, Serialize};

/// Thresholds used when rebuilding reading order from positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Minimum vertical distance (points) between run centers on one line
    pub line_tolerance: f32,

    /// Line tolerance as a fraction of the run height; the larger of the
    /// two tolerances applies
    pub line_tolerance_ratio: f32,

    /// Horizontal gap, as a fraction of the average character width, above
    /// which adjacent runs are separated by a space
    pub word_gap_ratio: f32,

    /// Drop runs lying entirely outside the (normalized) page rectangle
    pub clip_to_page: bool,
}

impl LayoutConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute line tolerance.
    pub fn with_line_tolerance(mut self, points: f32) -> Self {
        self.line_tolerance = points.max(0.0);
        self
    }

    /// Set the height-relative line tolerance.
    pub fn with_line_tolerance_ratio(mut self, ratio: f32) -> Self {
        self.line_tolerance_ratio = ratio.max(0.0);
        self
    }

    /// Set the word gap ratio.
    pub fn with_word_gap_ratio(mut self, ratio: f32) -> Self {
        self.word_gap_ratio = ratio.max(0.0);
        self
    }

    /// Enable or disable clipping against the page rectangle.
    pub fn with_clipping(mut self, clip: bool) -> Self {
        self.clip_to_page = clip;
        self
    }

    /// Effective tolerance for a run of the given height.
    pub fn tolerance_for_height(&self, height: f32) -> f32 {
        let height = if height.is_finite() { height.abs() } else { 0.0 };
        self.line_tolerance.max(self.line_tolerance_ratio * height)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
            line_tolerance_ratio: 0.3,
            word_gap_ratio: 0.2,
            clip_to_page: true,
        }
    }
}
