//! Extraction statistics.

use serde::{Deserialize, Serialize};

/// Statistics collected over extracted page texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total number of pages processed
    pub page_count: u32,

    /// Pages that produced no text
    pub empty_page_count: u32,

    /// Number of non-empty lines
    pub line_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics over a sequence of page texts.
    pub fn from_pages<'a>(pages: impl IntoIterator<Item = &'a str>) -> Self {
        let mut stats = Self::new();
        for text in pages {
            stats.add_page(text);
        }
        stats
    }

    /// Count one page of text.
    pub fn add_page(&mut self, text: &str) {
        self.page_count += 1;
        if text.trim().is_empty() {
            self.empty_page_count += 1;
        }
        self.count_text(text);
    }

    /// Add line, word and character counts from text.
    fn count_text(&mut self, text: &str) {
        self.line_count += text.lines().filter(|l| !l.trim().is_empty()).count() as u32;

        // Word count: whitespace-separated tokens
        self.word_count += text.split_whitespace().count() as u32;

        // Character count: non-whitespace characters
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_stats_count_text() {
        let mut stats = ExtractionStats::new();
        stats.count_text("Hello, world!\n\nThis is a test.");

        assert_eq!(stats.line_count, 2);
        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_extraction_stats_from_pages() {
        let stats = ExtractionStats::from_pages(["one two", "", "three"]);
        assert_eq!(stats.page_count, 3);
        assert_eq!(stats.empty_page_count, 1);
        assert_eq!(stats.word_count, 3);
    }
}
