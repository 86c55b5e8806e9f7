//! Page selection.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Which pages to extract. Page numbers are one-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Every page
    #[default]
    All,
    /// A range of pages (inclusive)
    Range(RangeInclusive<u32>),
    /// Several ranges, sorted with overlapping and adjacent ones merged
    Pages(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Parse a page selection string (e.g., "1-10", "1,3,5-7").
    ///
    /// Ranges are kept as ranges, so a huge range costs nothing until it is
    /// checked against a document.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = parse_bounds(start, end)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut ranges = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => parse_bounds(start, end)?,
                None => {
                    let page = parse_page_number(part)?;
                    (page, page)
                }
            };
            ranges.push(start..=end);
        }

        Ok(PageSelection::Pages(merge_ranges(ranges)))
    }
}

impl std::str::FromStr for PageSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn merge_ranges(mut ranges: Vec<RangeInclusive<u32>>) -> Vec<RangeInclusive<u32>> {
    ranges.sort_unstable_by_key(|r| *r.start());

    let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        if let Some(last) = merged.last_mut() {
            if *range.start() <= last.end().saturating_add(1) {
                if range.end() > last.end() {
                    *last = *last.start()..=*range.end();
                }
                continue;
            }
        }
        merged.push(range);
    }
    merged
}

fn parse_page_number(s: &str) -> Result<u32> {
    let page: u32 = s
        .trim()
        .parse()
        .map_err(|_| Error::InvalidPageRange(format!("invalid page number {:?}", s.trim())))?;
    if page == 0 {
        return Err(Error::InvalidPageRange(
            "page numbers start at 1".to_string(),
        ));
    }
    Ok(page)
}

fn parse_bounds(start: &str, end: &str) -> Result<(u32, u32)> {
    let start = parse_page_number(start)?;
    let end = parse_page_number(end)?;
    if start > end {
        return Err(Error::InvalidPageRange(format!(
            "range start {} is after end {}",
            start, end
        )));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(PageSelection::parse("  ").unwrap(), PageSelection::All);
        assert_eq!(
            PageSelection::parse("1-10").unwrap(),
            PageSelection::Range(1..=10)
        );
        assert_eq!(
            PageSelection::parse("10,1,3,5-7,3,8").unwrap(),
            PageSelection::Pages(vec![1..=1, 3..=3, 5..=8, 10..=10])
        );
        assert_eq!(
            "4".parse::<PageSelection>().unwrap(),
            PageSelection::Pages(vec![4..=4])
        );
    }

    #[test]
    fn test_page_selection_parse_errors() {
        for input in ["0", "abc", "5-2", "1,,2", "1-x", "0-3"] {
            let result = PageSelection::parse(input);
            assert!(
                matches!(result, Err(Error::InvalidPageRange(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_page_selection_keeps_huge_ranges_unexpanded() {
        assert_eq!(
            PageSelection::parse("1,2-4000000000").unwrap(),
            PageSelection::Pages(vec![1..=4_000_000_000])
        );
        assert_eq!(
            PageSelection::parse("3-4294967295,7-9").unwrap(),
            PageSelection::Pages(vec![3..=u32::MAX])
        );
    }
}
