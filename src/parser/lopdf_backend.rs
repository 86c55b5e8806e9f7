//! [`PdfBackend`] backed by `lopdf`.

use std::collections::{BTreeMap, HashMap};

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{PageContent, Rect};

use super::backend::{decode_text_simple, page_error, ContentOp, PdfBackend, PdfValue};
use super::content::{ContentInterpreter, FontSource, GlyphCode, DEFAULT_GLYPH_WIDTH};
use super::security::user_password_from_owner;

/// US Letter in points, used when a page has no usable box.
const LETTER: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Guards `/Parent` walks against cyclic page trees.
const MAX_TREE_DEPTH: usize = 32;

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    page_ids: Vec<ObjectId>,
    encrypted: bool,
}

impl LopdfBackend {
    /// PDF version from the header.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_box(&self, page_id: ObjectId) -> [f32; 4] {
        let Ok(page_dict) = self.doc.get_dictionary(page_id) else {
            return LETTER;
        };
        resolve_inherited(&self.doc, page_dict, b"CropBox")
            .and_then(|obj| number_array(&self.doc, obj))
            .or_else(|| {
                resolve_inherited(&self.doc, page_dict, b"MediaBox")
                    .and_then(|obj| number_array(&self.doc, obj))
            })
            .filter(|b| b.len() == 4 && b.iter().all(|v| v.is_finite()))
            .map(|b| [b[0].min(b[2]), b[1].min(b[3]), b[0].max(b[2]), b[1].max(b[3])])
            .unwrap_or(LETTER)
    }

    fn decode_operations(&self, index: usize, page_id: ObjectId) -> Result<Vec<ContentOp>> {
        let data = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| page_error(index, e.into()))?;
        let content = Content::decode(&data).map_err(|e| page_error(index, e.into()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }
}

impl PdfBackend for LopdfBackend {
    fn load(data: &[u8]) -> Result<Self> {
        let format = detect_format_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        let encrypted = doc.is_encrypted();
        let page_ids = doc.get_pages().into_values().collect();
        log::debug!("loaded {} (encrypted: {})", format, encrypted);

        Ok(Self {
            doc,
            page_ids,
            encrypted,
        })
    }

    fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    fn unlock(&mut self, password: &str) -> Result<()> {
        if !self.encrypted {
            return Ok(());
        }
        if let Err(e) = self.doc.decrypt(password) {
            log::debug!("not the user password: {}", e);
            let user_password = user_password_from_owner(&self.doc, password.as_bytes())
                .ok_or(Error::Unlock)?;
            self.doc.decrypt(&user_password).map_err(|e| {
                log::debug!("not the owner password: {}", e);
                Error::Unlock
            })?;
        }
        self.encrypted = false;
        self.page_ids = self.doc.get_pages().into_values().collect();
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_content(&self, index: usize) -> Result<PageContent> {
        let page_id = *self.page_ids.get(index).ok_or(Error::IndexOutOfRange {
            index,
            count: self.page_ids.len(),
        })?;

        let [x0, y0, x1, y1] = self.page_box(page_id);
        let page_rect = Rect::new(x0, 0.0, x1, y1 - y0);

        let ops = self.decode_operations(index, page_id)?;
        let fonts = PageFonts::new(&self.doc, page_id);
        let runs = ContentInterpreter::new(index, &fonts, y1).run(&ops)?;
        log::debug!("page {}: {} ops, {} runs", index, ops.len(), runs.len());

        Ok(PageContent::new(page_rect, runs))
    }
}

/// Widths for one font, in thousandths of an em.
#[derive(Debug, Clone)]
struct FontMetrics {
    two_byte: bool,
    first_char: u32,
    widths: Vec<f32>,
    cid_widths: HashMap<u32, f32>,
    default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            two_byte: false,
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            default_width: DEFAULT_GLYPH_WIDTH,
        }
    }
}

impl FontMetrics {
    fn from_dict(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let subtype = font.get(b"Subtype").ok().and_then(|o| o.as_name().ok());
        if subtype == Some(b"Type0".as_slice()) {
            return Self::composite(doc, font);
        }

        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| number(doc, o))
            .map_or(0, |v| v.max(0.0) as u32);
        let widths = font
            .get(b"Widths")
            .ok()
            .and_then(|o| number_array(doc, o))
            .unwrap_or_default();
        let default_width = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|o| number(doc, o))
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_GLYPH_WIDTH);

        Self {
            first_char,
            widths,
            default_width,
            ..Self::default()
        }
    }

    /// Type0 fonts: two-byte codes, widths from the descendant's `/W`.
    fn composite(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let descendant = font
            .get(b"DescendantFonts")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .and_then(|arr| arr.first())
            .and_then(|o| resolve(doc, o).as_dict().ok());

        let mut metrics = Self {
            two_byte: true,
            default_width: 1000.0,
            ..Self::default()
        };
        let Some(descendant) = descendant else {
            return metrics;
        };

        if let Some(dw) = descendant.get(b"DW").ok().and_then(|o| number(doc, o)) {
            metrics.default_width = dw;
        }
        if let Ok(w) = descendant.get(b"W").and_then(|o| resolve(doc, o).as_array()) {
            metrics.cid_widths = parse_cid_widths(doc, w);
        }
        metrics
    }

    fn width(&self, code: u32) -> f32 {
        if self.two_byte {
            return self
                .cid_widths
                .get(&code)
                .copied()
                .unwrap_or(self.default_width);
        }
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .unwrap_or(self.default_width)
    }

    fn codes(&self, bytes: &[u8]) -> Vec<GlyphCode> {
        if self.two_byte {
            bytes
                .chunks(2)
                .map(|c| {
                    let code = c.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32);
                    GlyphCode {
                        code,
                        width: self.width(code),
                    }
                })
                .collect()
        } else {
            bytes
                .iter()
                .map(|&b| GlyphCode {
                    code: b as u32,
                    width: self.width(b as u32),
                })
                .collect()
        }
    }
}

/// `/W` array: `c [w1 w2 ...]` and `c_first c_last w` entries.
fn parse_cid_widths(doc: &LopdfDocument, w: &[Object]) -> HashMap<u32, f32> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < w.len() {
        let Some(first) = number(doc, &w[i]) else {
            break;
        };
        let first = first.max(0.0) as u32;
        match w.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, obj) in list.iter().enumerate() {
                    if let Some(width) = number(doc, obj) {
                        widths.insert(first + offset as u32, width);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let (Some(last), Some(width)) = (
                    number(doc, last),
                    w.get(i + 2).and_then(|o| number(doc, o)),
                ) else {
                    break;
                };
                let last = last.max(0.0) as u32;
                for code in first..=last.min(first.saturating_add(0xFFFF)) {
                    widths.insert(code, width);
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}

/// Fonts of one page, as seen by the content interpreter.
struct PageFonts<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    metrics: HashMap<Vec<u8>, FontMetrics>,
}

impl<'a> PageFonts<'a> {
    fn new(doc: &'a LopdfDocument, page_id: ObjectId) -> Self {
        let fonts = doc.get_page_fonts(page_id).unwrap_or_else(|e| {
            log::debug!("no fonts for page object {:?}: {}", page_id, e);
            BTreeMap::new()
        });
        let metrics = fonts
            .iter()
            .map(|(name, dict)| (name.clone(), FontMetrics::from_dict(doc, dict)))
            .collect();
        Self {
            doc,
            fonts,
            metrics,
        }
    }
}

impl FontSource for PageFonts<'_> {
    fn decode(&self, font: &[u8], bytes: &[u8]) -> std::result::Result<String, String> {
        let Some(dict) = self.fonts.get(font) else {
            return decode_text_simple(bytes);
        };
        match dict.get_font_encoding(self.doc) {
            Ok(encoding) => {
                LopdfDocument::decode_text(&encoding, bytes).map_err(|e| e.to_string())
            }
            Err(_) => decode_text_simple(bytes),
        }
    }

    fn glyph_codes(&self, font: &[u8], bytes: &[u8]) -> Vec<GlyphCode> {
        match self.metrics.get(font) {
            Some(metrics) => metrics.codes(bytes),
            None => FontMetrics::default().codes(bytes),
        }
    }
}

/// Look `key` up on the page, then up the `/Parent` chain.
fn resolve_inherited<'a>(
    doc: &'a LopdfDocument,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = dict;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(obj) = current.get(key) {
            return Some(obj);
        }
        current = current
            .get(b"Parent")
            .and_then(|parent| parent.as_reference())
            .and_then(|id| doc.get_dictionary(id))
            .ok()?;
    }
    None
}

/// Follow one level of indirection.
fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn number(doc: &LopdfDocument, obj: &Object) -> Option<f32> {
    match resolve(doc, obj) {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn number_array(doc: &LopdfDocument, obj: &Object) -> Option<Vec<f32>> {
    match resolve(doc, obj) {
        Object::Array(items) => items.iter().map(|o| number(doc, o)).collect(),
        _ => None,
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;

    #[test]
    fn test_convert_object() {
        let obj = Object::Array(vec![
            Object::String(b"Hi".to_vec(), StringFormat::Literal),
            Object::Integer(-120),
            Object::Real(1.5),
            Object::Name(b"F1".to_vec()),
            Object::Null,
        ]);
        assert_eq!(
            convert_object(&obj),
            PdfValue::Array(vec![
                PdfValue::Str(b"Hi".to_vec()),
                PdfValue::Integer(-120),
                PdfValue::Real(1.5),
                PdfValue::Name(b"F1".to_vec()),
                PdfValue::Other,
            ])
        );
    }

    #[test]
    fn test_parse_cid_widths() {
        let doc = LopdfDocument::new();
        let w = vec![
            Object::Integer(1),
            Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
            Object::Integer(10),
            Object::Integer(12),
            Object::Integer(1000),
        ];
        let widths = parse_cid_widths(&doc, &w);
        assert_eq!(widths.get(&1), Some(&500.0));
        assert_eq!(widths.get(&2), Some(&600.0));
        assert_eq!(widths.get(&11), Some(&1000.0));
        assert_eq!(widths.get(&13), None);
    }

    #[test]
    fn test_simple_font_widths() {
        let doc = LopdfDocument::new();
        let mut font = Dictionary::new();
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("FirstChar", Object::Integer(65));
        font.set(
            "Widths",
            Object::Array(vec![Object::Integer(700), Object::Integer(650)]),
        );

        let metrics = FontMetrics::from_dict(&doc, &font);
        let codes = metrics.codes(b"ABZ");
        assert_eq!(codes[0].width, 700.0);
        assert_eq!(codes[1].width, 650.0);
        assert_eq!(codes[2].width, DEFAULT_GLYPH_WIDTH);
    }

    #[test]
    fn test_composite_font_reads_two_byte_codes() {
        let metrics = FontMetrics {
            two_byte: true,
            default_width: 1000.0,
            ..FontMetrics::default()
        };
        let codes = metrics.codes(&[0x00, 0x41, 0x30, 0x42]);
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0].code, 0x41);
        assert_eq!(codes[1].code, 0x3042);
        assert_eq!(codes[1].width, 1000.0);
    }
}
