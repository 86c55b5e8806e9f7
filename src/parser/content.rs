//! Content stream interpretation.
//!
//! Walks the operators of a page content stream, tracking the graphics and
//! text state, and turns every text-showing operator into a [`GlyphRun`] in
//! top-down page coordinates.

use crate::error::{Error, Result};
use crate::layout::is_spaceless_script_char;
use crate::model::{GlyphRun, Point, Rect};

use super::backend::{get_number_from_value, ContentOp, PdfValue};

/// Ascent and descent as fractions of the font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// `TJ` adjustments larger than this (thousandths of an em) read as a word
/// space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Default glyph advance in thousandths of an em.
pub const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// A 2D affine transform in PDF row-vector form `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self` applied first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn from_operands(op: &ContentOp) -> Option<Matrix> {
        Some(Matrix::new(
            op.number(0)?,
            op.number(1)?,
            op.number(2)?,
            op.number(3)?,
            op.number(4)?,
            op.number(5)?,
        ))
    }
}

/// One character code of a shown string with its advance width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphCode {
    pub code: u32,
    /// Advance in thousandths of an em
    pub width: f32,
}

/// Font knowledge the interpreter needs, keyed by font resource name.
pub trait FontSource {
    /// Decode string bytes shown with `font` to Unicode.
    fn decode(&self, font: &[u8], bytes: &[u8]) -> std::result::Result<String, String>;

    /// Split string bytes into character codes with advance widths.
    fn glyph_codes(&self, font: &[u8], bytes: &[u8]) -> Vec<GlyphCode>;
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Vec<u8>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: Vec::new(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// A run still open to trailing separators.
#[derive(Debug)]
struct PendingRun {
    text: String,
    origin: Point,
    bbox: Rect,
    size: f32,
}

/// Collects runs and embeds the separators that make raw order readable:
/// a trailing `'\n'` when the next run starts a new line, a trailing space
/// when it starts after a visible gap on the same line.
#[derive(Debug, Default)]
struct RunCollector {
    runs: Vec<PendingRun>,
}

impl RunCollector {
    fn push(&mut self, run: PendingRun) {
        if let Some(prev) = self.runs.last_mut() {
            let size = prev.size.max(run.size);
            let dy = (run.origin.y - prev.origin.y).abs();
            if dy > size * 0.5 {
                if !prev.text.ends_with('\n') {
                    prev.text.push('\n');
                }
            } else {
                let gap = run.bbox.left - prev.bbox.right;
                let prev_last = prev.text.chars().last();
                let next_first = run.text.chars().next();
                let spaced = prev_last.map_or(true, char::is_whitespace)
                    || next_first.map_or(true, char::is_whitespace);
                let cjk = prev_last.map_or(false, is_spaceless_script_char)
                    && next_first.map_or(false, is_spaceless_script_char);
                if gap > run.size * 0.15 && !spaced && !cjk {
                    prev.text.push(' ');
                }
            }
        }
        self.runs.push(run);
    }

    fn finish(self) -> Vec<GlyphRun> {
        self.runs
            .into_iter()
            .map(|r| GlyphRun::new(r.text, r.origin, r.bbox))
            .collect()
    }
}

/// Interprets one page's content stream.
pub struct ContentInterpreter<'a, F: FontSource> {
    page: usize,
    fonts: &'a F,
    /// Maps user space to top-down page space
    page_transform: Matrix,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text_block: bool,
    collector: RunCollector,
}

impl<'a, F: FontSource> ContentInterpreter<'a, F> {
    /// Create an interpreter for page `page` (zero-based, used in errors).
    ///
    /// `page_top` is the top edge of the page box in user space; y is
    /// flipped around it so that page coordinates grow downward.
    pub fn new(page: usize, fonts: &'a F, page_top: f32) -> Self {
        Self {
            page,
            fonts,
            page_transform: Matrix::new(1.0, 0.0, 0.0, -1.0, 0.0, page_top),
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text_block: false,
            collector: RunCollector::default(),
        }
    }

    /// Run all operations and return the glyph runs in content order.
    pub fn run(mut self, ops: &[ContentOp]) -> Result<Vec<GlyphRun>> {
        for op in ops {
            self.execute(op)?;
        }
        Ok(self.collector.finish())
    }

    fn execute(&mut self, op: &ContentOp) -> Result<()> {
        log::trace!("page {}: {} {:?}", self.page, op.operator, op.operands);
        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(op) {
                    self.state.ctm = m.then(&self.state.ctm);
                }
            }
            "BT" => {
                self.in_text_block = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text_block = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.state.font = name.clone();
                }
                if let Some(size) = op.number(1) {
                    self.state.font_size = size;
                }
            }
            "Tc" => self.state.char_spacing = op.number(0).unwrap_or(0.0),
            "Tw" => self.state.word_spacing = op.number(0).unwrap_or(0.0),
            "Tz" => self.state.horizontal_scale = op.number(0).unwrap_or(100.0) / 100.0,
            "TL" => self.state.leading = op.number(0).unwrap_or(0.0),
            "Ts" => self.state.rise = op.number(0).unwrap_or(0.0),
            "Td" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    self.state.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(op) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(text @ PdfValue::Str(_)) = op.operands.first() {
                    self.show(std::slice::from_ref(text))?;
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show(items)?;
                }
            }
            "'" => {
                self.next_line();
                if let Some(text @ PdfValue::Str(_)) = op.operands.first() {
                    self.show(std::slice::from_ref(text))?;
                }
            }
            "\"" => {
                if let Some(aw) = op.number(0) {
                    self.state.word_spacing = aw;
                }
                if let Some(ac) = op.number(1) {
                    self.state.char_spacing = ac;
                }
                self.next_line();
                if let Some(text @ PdfValue::Str(_)) = op.operands.get(2) {
                    self.show(std::slice::from_ref(text))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    /// Show strings and `TJ` adjustments as one run.
    fn show(&mut self, items: &[PdfValue]) -> Result<()> {
        if !self.in_text_block {
            return Ok(());
        }

        let start = self.text_matrix;
        let font_size = self.state.font_size;
        let h_scale = self.state.horizontal_scale;
        let mut text = String::new();
        let mut advance = 0.0f32;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let decoded = self
                        .fonts
                        .decode(&self.state.font, bytes)
                        .map_err(|reason| Error::page_read(self.page, reason))?;
                    text.push_str(&decoded);

                    for glyph in self.fonts.glyph_codes(&self.state.font, bytes) {
                        let mut tx = glyph.width / 1000.0 * font_size + self.state.char_spacing;
                        if glyph.code == 32 {
                            tx += self.state.word_spacing;
                        }
                        advance += tx * h_scale;
                    }
                }
                other => {
                    let Some(adjustment) = get_number_from_value(other) else {
                        continue;
                    };
                    advance -= adjustment / 1000.0 * font_size * h_scale;
                    if -adjustment > TJ_SPACE_THRESHOLD {
                        let needs_space = text
                            .chars()
                            .last()
                            .map_or(false, |c| !c.is_whitespace() && !is_spaceless_script_char(c));
                        if needs_space {
                            text.push(' ');
                        }
                    }
                }
            }
        }

        self.text_matrix = Matrix::translation(advance, 0.0).then(&self.text_matrix);

        if text.trim().is_empty() {
            return Ok(());
        }

        let to_page = start.then(&self.state.ctm).then(&self.page_transform);
        let rise = self.state.rise;
        let (ox, oy) = to_page.apply(0.0, rise);

        let corners = [
            to_page.apply(0.0, rise - DESCENT * font_size),
            to_page.apply(advance, rise - DESCENT * font_size),
            to_page.apply(0.0, rise + ASCENT * font_size),
            to_page.apply(advance, rise + ASCENT * font_size),
        ];
        let bbox = Rect::new(
            corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min),
            corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min),
            corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max),
            corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max),
        );
        let size = bbox.height().abs();

        self.collector.push(PendingRun {
            text,
            origin: Point::new(ox, oy),
            bbox,
            size,
        });
        Ok(())
    }
}
