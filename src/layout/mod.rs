//! Layout reconstruction.
//!
//! Turns a page's glyph runs into one string, either in content stream
//! order ([`LayoutMode::Raw`]) or in reading order rebuilt from run
//! positions ([`LayoutMode::Physical`]).

mod config;
mod physical;

pub use config::LayoutConfig;
pub use physical::{group_runs_into_lines, is_spaceless_script_char, physical_text, TextLine};

use crate::model::{LayoutMode, PageContent};

/// Reconstruct the text of one page in the given mode.
///
/// Never fails: an empty page yields an empty string.
pub fn reconstruct(page: &PageContent, mode: LayoutMode, config: &LayoutConfig) -> String {
    match mode {
        LayoutMode::Raw => raw_text(page),
        LayoutMode::Physical => physical_text(page, config),
    }
}

/// Concatenate run texts in stored order.
///
/// Separators are exactly those embedded in the runs; the page rectangle is
/// never consulted.
pub fn raw_text(page: &PageContent) -> String {
    let capacity = page.runs().iter().map(|r| r.text().len()).sum();
    let mut out = String::with_capacity(capacity);
    for run in page.runs() {
        out.push_str(run.text());
    }
    out
}
