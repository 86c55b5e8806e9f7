//! Physical (reading order) layout.
//!
//! Runs are grouped into lines by vertical-center proximity, lines are
//! ordered top to bottom and runs left to right. There is no column
//! detection: columns come out separated only when y-then-x ordering keeps
//! them apart.

use std::cmp::Ordering;

use crate::model::{GlyphRun, PageContent, Rect};

use super::LayoutConfig;

/// A line of runs sharing (approximately) one baseline.
#[derive(Debug, Clone)]
pub struct TextLine<'a> {
    /// Runs sorted by origin x
    pub runs: Vec<&'a GlyphRun>,
    /// Mean baseline of the runs
    pub baseline: f32,
}

impl<'a> TextLine<'a> {
    /// Create a line from runs, sorting them left to right.
    pub fn from_runs(mut runs: Vec<&'a GlyphRun>) -> Self {
        runs.sort_by(|a, b| a.origin().x.total_cmp(&b.origin().x));

        let baselines: Vec<f32> = runs
            .iter()
            .map(|r| r.origin().y)
            .filter(|y| y.is_finite())
            .collect();
        let baseline = if baselines.is_empty() {
            runs.first().map(|r| vertical_key(r)).unwrap_or(0.0)
        } else {
            baselines.iter().sum::<f32>() / baselines.len() as f32
        };

        Self { runs, baseline }
    }

    /// Text of the line with spaces inserted at word gaps.
    ///
    /// Line breaks at run edges are dropped and trailing whitespace is
    /// trimmed. No space goes in when either side of the junction already
    /// has whitespace, or when both sides are spaceless-script characters.
    pub fn text(&self, config: &LayoutConfig) -> String {
        let mut result = String::new();
        let mut prev: Option<&GlyphRun> = None;

        for run in &self.runs {
            let text = run.text().trim_matches(is_line_break);
            if text.is_empty() {
                continue;
            }

            if let Some(prev_run) = prev {
                if needs_space(prev_run, &result, run, text, config) {
                    result.push(' ');
                }
            }

            result.push_str(text);
            prev = Some(run);
        }

        result.truncate(result.trim_end().len());
        result
    }
}

/// Rebuild reading order for a page.
///
/// When clipping is enabled, runs outside the page are dropped. The clip area
/// is [`Rect::bounding_square`], which contains the normalized page square and
/// every run lying within the page's original extremes. Output lines are
/// separated by a single `'\n'`.
pub fn physical_text(page: &PageContent, config: &LayoutConfig) -> String {
    let clip = if config.clip_to_page {
        page.page_rect().bounding_square()
    } else {
        None
    };

    let runs: Vec<&GlyphRun> = page
        .runs()
        .iter()
        .filter(|run| clip.map_or(true, |rect| keep_run(run, &rect)))
        .collect();

    let dropped = page.runs().len() - runs.len();
    if dropped > 0 {
        log::debug!("Clipped {} runs outside the page rectangle", dropped);
    }

    let lines = group_runs_into_lines(runs, config);

    let mut out = String::new();
    for line in &lines {
        let text = line.text(config);
        if text.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&text);
    }
    out
}

/// Group runs into lines, ordered top to bottom.
pub fn group_runs_into_lines<'a>(
    mut runs: Vec<&'a GlyphRun>,
    config: &LayoutConfig,
) -> Vec<TextLine<'a>> {
    if runs.is_empty() {
        return vec![];
    }

    // Sort by vertical center (y grows downward) then x
    runs.sort_by(|a, b| {
        vertical_key(a)
            .total_cmp(&vertical_key(b))
            .then_with(|| a.origin().x.total_cmp(&b.origin().x))
    });

    let mut lines: Vec<TextLine<'a>> = Vec::new();
    let mut current: Vec<&'a GlyphRun> = Vec::new();
    let mut anchor = 0.0f32;

    for run in runs {
        let center = vertical_key(run);
        if !current.is_empty() {
            let tolerance = config.tolerance_for_height(run.bounding_box().height());
            if (center - anchor).abs() <= tolerance {
                current.push(run);
                continue;
            }
            lines.push(TextLine::from_runs(std::mem::take(&mut current)));
        }
        anchor = center;
        current.push(run);
    }

    if !current.is_empty() {
        lines.push(TextLine::from_runs(current));
    }

    lines.sort_by(|a, b| a.baseline.total_cmp(&b.baseline));
    lines
}

/// Vertical position used for grouping: box center, or the baseline when
/// the box is unusable.
fn vertical_key(run: &GlyphRun) -> f32 {
    let center = run.bounding_box().center_y();
    if center.is_finite() {
        center
    } else {
        run.origin().y
    }
}

/// Keep runs that overlap the clip rectangle. Boxes with non-finite edges
/// cannot be placed and are kept.
fn keep_run(run: &GlyphRun, clip: &Rect) -> bool {
    let bbox = run.bounding_box();
    if !bbox.is_finite() {
        return true;
    }
    let ordered = Rect::new(
        bbox.left.min(bbox.right),
        bbox.top.min(bbox.bottom),
        bbox.left.max(bbox.right),
        bbox.top.max(bbox.bottom),
    );
    clip.intersects(&ordered)
}

fn needs_space(
    prev: &GlyphRun,
    emitted: &str,
    run: &GlyphRun,
    text: &str,
    config: &LayoutConfig,
) -> bool {
    let gap = run.bounding_box().left - prev.bounding_box().right;
    let threshold = run.avg_char_width() * config.word_gap_ratio;
    if gap.partial_cmp(&threshold) != Some(Ordering::Greater) {
        return false;
    }

    let prev_ends_with_space = emitted.ends_with(char::is_whitespace);
    let curr_starts_with_space = text.starts_with(char::is_whitespace);
    if prev_ends_with_space || curr_starts_with_space {
        return false;
    }

    let prev_is_cjk = emitted
        .chars()
        .last()
        .map(is_spaceless_script_char)
        .unwrap_or(false);
    let curr_is_cjk = text
        .chars()
        .next()
        .map(is_spaceless_script_char)
        .unwrap_or(false);
    !(prev_is_cjk && curr_is_cjk)
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0C}')
}

/// Check if a character belongs to a script written without word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana
    || (0x3040..=0x309F).contains(&code)
    // Katakana
    || (0x30A0..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
