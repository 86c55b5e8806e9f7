//! Points and rectangles in page space.

use serde::{Deserialize, Serialize};

/// A position on the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box given by its edges.
///
/// Nothing forces `left <= right` or `top <= bottom`: producers hand out
/// inverted or non-finite boxes, and consumers normalize where they need to.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Create a rectangle from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width (may be negative for inverted boxes).
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height (may be negative for inverted boxes).
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Vertical midpoint.
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Whether all four edges are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }

    /// Whether two well-ordered rectangles overlap (touching edges count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    /// Collapse a possibly degenerate page rectangle into a well-ordered square.
    ///
    /// Workaround for producers that report inverted page boxes: the result is
    /// `(lo, lo, hi, hi)` with `lo = min(left, top)` and
    /// `hi = max(right, bottom)`. Non-finite edges are ignored; `None` means no
    /// finite bound was left to build a rectangle from.
    pub fn normalized_square(&self) -> Option<Rect> {
        let lo = finite_min(self.left, self.top)?;
        let hi = finite_max(self.right, self.bottom)?;
        let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
        Some(Rect::new(lo, lo, hi, hi))
    }

    /// [`normalized_square`](Rect::normalized_square) grown to every finite
    /// edge of this rectangle.
    ///
    /// Anything lying within the original extremes stays inside the result.
    pub fn bounding_square(&self) -> Option<Rect> {
        let square = self.normalized_square()?;
        let (lo, hi) = [self.left, self.top, self.right, self.bottom]
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((square.left, square.right), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Rect::new(lo, lo, hi, hi))
    }
}

fn finite_min(a: f32, b: f32) -> Option<f32> {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => Some(a.min(b)),
        (true, false) => Some(a),
        (false, true) => Some(b),
        (false, false) => None,
    }
}

fn finite_max(a: f32, b: f32) -> Option<f32> {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => Some(a.max(b)),
        (true, false) => Some(a),
        (false, true) => Some(b),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_inverted_rect() {
        let rect = Rect::new(100.0, -5.0, 10.0, 50.0);
        assert_eq!(
            rect.normalized_square(),
            Some(Rect::new(-5.0, -5.0, 50.0, 50.0))
        );
    }

    #[test]
    fn test_bounding_square_covers_original_extremes() {
        let rect = Rect::new(100.0, -5.0, 10.0, 50.0);
        assert_eq!(
            rect.bounding_square(),
            Some(Rect::new(-5.0, -5.0, 100.0, 100.0))
        );
        assert_eq!(
            Rect::new(f32::NAN, 3.0, f32::INFINITY, 7.0).bounding_square(),
            Some(Rect::new(3.0, 3.0, 7.0, 7.0))
        );
        let unknown = Rect::new(f32::NAN, f32::NAN, f32::NAN, f32::NAN);
        assert_eq!(unknown.bounding_square(), None);
    }

    #[test]
    fn test_normalize_regular_page() {
        let rect = Rect::new(0.0, 0.0, 612.0, 792.0);
        assert_eq!(
            rect.normalized_square(),
            Some(Rect::new(0.0, 0.0, 792.0, 792.0))
        );
    }

    #[test]
    fn test_normalize_swaps_crossed_bounds() {
        let rect = Rect::new(100.0, 90.0, 10.0, 5.0);
        assert_eq!(
            rect.normalized_square(),
            Some(Rect::new(10.0, 10.0, 90.0, 90.0))
        );
    }

    #[test]
    fn test_normalize_non_finite() {
        let rect = Rect::new(f32::NAN, 3.0, f32::INFINITY, 40.0);
        assert_eq!(
            rect.normalized_square(),
            Some(Rect::new(3.0, 3.0, 40.0, 40.0))
        );

        let rect = Rect::new(f32::NAN, f32::NAN, 10.0, 10.0);
        assert_eq!(rect.normalized_square(), None);
    }

    #[test]
    fn test_intersects() {
        let page = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(page.intersects(&Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(page.intersects(&Rect::new(90.0, 90.0, 120.0, 120.0)));
        assert!(page.intersects(&Rect::new(100.0, 0.0, 110.0, 10.0)));
        assert!(!page.intersects(&Rect::new(101.0, 0.0, 110.0, 10.0)));
        assert!(!page.intersects(&Rect::new(0.0, -20.0, 10.0, -1.0)));
    }
}
