//! Page-indexed text extraction over an opened document.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::layout::reconstruct;
use crate::model::{LayoutMode, PageContent};
use crate::parser::{page_error, ErrorMode, ExtractOptions, LopdfBackend, PdfBackend};
use crate::render::PageSelection;

/// Separator between pages in whole-document text.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// An opened PDF document.
///
/// Construction is all-or-nothing: a `Pdf` exists only once the bytes parsed
/// and any password unlocked the document. After [`close`](Pdf::close) every
/// read fails with [`Error::DocumentClosed`].
///
/// # Example
///
/// ```no_run
/// use pdftotext::Pdf;
///
/// let data = std::fs::read("document.pdf")?;
/// let pdf = Pdf::open(&data, None)?;
/// for index in 0..pdf.page_count() {
///     println!("{}", pdf.read_page(index)?);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Pdf<B = LopdfBackend> {
    backend: Option<B>,
    page_count: usize,
    options: ExtractOptions,
}

impl Pdf<LopdfBackend> {
    /// Open a document from bytes with physical layout.
    pub fn open(data: &[u8], password: Option<&str>) -> Result<Self> {
        let mut options = ExtractOptions::new();
        if let Some(password) = password {
            options = options.with_password(password);
        }
        Self::load_with_options(data, options)
    }

    /// Open a document from bytes with custom options.
    pub fn open_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        Self::load_with_options(data, options)
    }
}

impl<B: PdfBackend> Pdf<B> {
    /// Load a document through any backend.
    pub fn load_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        let backend = B::load(data)?;
        Self::from_backend(backend, options)
    }

    /// Take ownership of an already loaded backend and unlock it.
    ///
    /// Without a password an encrypted document is tried with the empty
    /// user password.
    pub fn from_backend(mut backend: B, options: ExtractOptions) -> Result<Self> {
        if backend.is_encrypted() {
            backend.unlock(options.password.as_deref().unwrap_or(""))?;
        }
        let page_count = backend.page_count();
        log::debug!(
            "opened document: {} pages, {} layout",
            page_count,
            options.layout_mode
        );

        Ok(Self {
            backend: Some(backend),
            page_count,
            options,
        })
    }

    /// Number of pages. Fixed at creation.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Layout mode used by every read.
    pub fn layout_mode(&self) -> LayoutMode {
        self.options.layout_mode
    }

    /// Options the document was opened with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Decoded content of one page (zero-based).
    pub fn page_content(&self, index: usize) -> Result<PageContent> {
        let backend = self.backend()?;
        if index >= self.page_count {
            return Err(Error::IndexOutOfRange {
                index,
                count: self.page_count,
            });
        }
        backend
            .page_content(index)
            .map_err(|e| page_error(index, e))
    }

    /// Text of one page (zero-based).
    pub fn read_page(&self, index: usize) -> Result<String> {
        let content = self.page_content(index)?;
        let text = reconstruct(&content, self.options.layout_mode, &self.options.layout);
        log::debug!(
            "page {}: {} runs -> {} chars",
            index,
            content.runs().len(),
            text.chars().count()
        );
        Ok(text)
    }

    /// Text of every page joined by a blank line.
    ///
    /// Strict mode stops at the first unreadable page. Lenient mode puts an
    /// empty string in its place.
    pub fn read_all(&self) -> Result<String> {
        self.backend()?;
        let mut texts = Vec::with_capacity(self.page_count);
        for index in 0..self.page_count {
            texts.push(self.read_page_or_skip(index)?);
        }
        Ok(texts.join(PAGE_SEPARATOR))
    }

    /// Iterate page texts in order.
    pub fn pages(&self) -> Pages<'_, B> {
        Pages {
            pdf: self,
            next: 0,
        }
    }

    /// Text of the selected pages as `(page_number, text)` pairs.
    ///
    /// Page numbers are one-based. A selected number beyond the page count
    /// fails with [`Error::IndexOutOfRange`] before any page is read.
    pub fn read_pages(&self, selection: &PageSelection) -> Result<Vec<(u32, String)>> {
        self.backend()?;
        let ranges = match selection {
            PageSelection::All => {
                let last = u32::try_from(self.page_count).unwrap_or(u32::MAX);
                vec![1..=last]
            }
            PageSelection::Range(range) => vec![range.clone()],
            PageSelection::Pages(ranges) => ranges.clone(),
        };

        for range in ranges.iter().filter(|r| !r.is_empty()) {
            self.index_for_number(*range.start())?;
            self.index_for_number(*range.end())?;
        }

        ranges
            .into_iter()
            .flatten()
            .map(|number| -> Result<(u32, String)> {
                let index = self.index_for_number(number)?;
                Ok((number, self.read_page_or_skip(index)?))
            })
            .collect()
    }

    /// Release the backend. Idempotent.
    pub fn close(&mut self) {
        if self.backend.take().is_some() {
            log::debug!("closed document");
        }
    }

    /// Whether [`close`](Pdf::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.backend.is_none()
    }

    fn backend(&self) -> Result<&B> {
        self.backend.as_ref().ok_or(Error::DocumentClosed)
    }

    fn read_page_or_skip(&self, index: usize) -> Result<String> {
        match self.read_page(index) {
            Ok(text) => Ok(text),
            Err(e @ Error::PageRead { .. }) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("skipping page {}: {}", index, e);
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }

    fn index_for_number(&self, number: u32) -> Result<usize> {
        if number == 0 {
            return Err(Error::InvalidPageRange(
                "page numbers start at 1".to_string(),
            ));
        }
        let index = number as usize - 1;
        if index >= self.page_count {
            return Err(Error::IndexOutOfRange {
                index,
                count: self.page_count,
            });
        }
        Ok(index)
    }
}

impl<B: PdfBackend + Sync> Pdf<B> {
    /// [`read_all`](Pdf::read_all) with pages decoded on the rayon pool.
    ///
    /// Output is identical to the sequential read; on failure the error of
    /// the lowest failing page is returned.
    pub fn read_all_parallel(&self) -> Result<String> {
        self.backend()?;
        let results: Vec<Result<String>> = (0..self.page_count)
            .into_par_iter()
            .map(|index| self.read_page_or_skip(index))
            .collect();

        let texts = results.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(texts.join(PAGE_SEPARATOR))
    }
}

impl<B> std::fmt::Debug for Pdf<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdf")
            .field("page_count", &self.page_count)
            .field("layout_mode", &self.options.layout_mode)
            .field("closed", &self.backend.is_none())
            .finish()
    }
}

/// Iterator over page texts, see [`Pdf::pages`].
pub struct Pages<'a, B> {
    pdf: &'a Pdf<B>,
    next: usize,
}

impl<B: PdfBackend> Iterator for Pages<'_, B> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.pdf.page_count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.pdf.read_page(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.pdf.page_count.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<B: PdfBackend> ExactSizeIterator for Pages<'_, B> {}

impl<'a, B: PdfBackend> IntoIterator for &'a Pdf<B> {
    type Item = Result<String>;
    type IntoIter = Pages<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages()
    }
}
