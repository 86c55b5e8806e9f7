//! Page content model.
//!
//! The decoded representation of a page's text as handed over by the PDF
//! collaborator: positioned glyph runs plus the page rectangle. Coordinates
//! are page space with y growing downward.

mod geometry;
mod page;
mod run;

pub use geometry::{Point, Rect};
pub use page::{LayoutMode, PageContent};
pub use run::GlyphRun;
