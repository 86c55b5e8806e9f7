//! Integration tests for the document extractor, driven by a mock backend.

use pdftotext::{
    Error, ExtractOptions, GlyphRun, LayoutConfig, LayoutMode, PageContent, PageSelection, Pdf,
    PdfBackend, Point, Rect, Result,
};

/// In-memory backend: pages are given up front, `None` marks a corrupt page.
struct MockBackend {
    pages: Vec<Option<PageContent>>,
    password: Option<String>,
    unlocked: bool,
}

impl MockBackend {
    fn new(pages: Vec<PageContent>) -> Self {
        Self {
            pages: pages.into_iter().map(Some).collect(),
            password: None,
            unlocked: false,
        }
    }

    fn with_corrupt_page(mut self, index: usize) -> Self {
        self.pages[index] = None;
        self
    }

    fn encrypted(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }
}

impl PdfBackend for MockBackend {
    fn load(data: &[u8]) -> Result<Self> {
        match data {
            b"MOCK" => Ok(Self::new(vec![page(vec![run("loaded", 0.0, 0.0)])])),
            _ => Err(Error::Parse("not a mock document".to_string())),
        }
    }

    fn is_encrypted(&self) -> bool {
        self.password.is_some() && !self.unlocked
    }

    fn unlock(&mut self, password: &str) -> Result<()> {
        match &self.password {
            None => Ok(()),
            Some(expected) if expected == password => {
                self.unlocked = true;
                Ok(())
            }
            Some(_) => Err(Error::Unlock),
        }
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_content(&self, index: usize) -> Result<PageContent> {
        match self.pages.get(index) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(Error::Parse(format!("corrupt page object {}", index))),
            None => Err(Error::IndexOutOfRange {
                index,
                count: self.pages.len(),
            }),
        }
    }
}

/// A run of 6pt-wide glyphs, 10pt tall, baseline at `y`.
fn run(text: &str, x: f32, y: f32) -> GlyphRun {
    let width = text.chars().count() as f32 * 6.0;
    GlyphRun::new(
        text,
        Point::new(x, y),
        Rect::new(x, y - 8.0, x + width, y + 2.0),
    )
}

fn page(runs: Vec<GlyphRun>) -> PageContent {
    PageContent::new(Rect::new(0.0, -20.0, 612.0, 792.0), runs)
}

fn open(backend: MockBackend) -> Pdf<MockBackend> {
    Pdf::from_backend(backend, ExtractOptions::default()).unwrap()
}

fn three_pages() -> MockBackend {
    MockBackend::new(vec![
        page(vec![run("First page", 10.0, 20.0)]),
        page(vec![run("Second", 10.0, 20.0), run("page", 60.0, 20.0)]),
        page(vec![run("Third page", 10.0, 20.0)]),
    ])
}

// ==================== Page Access ====================

#[test]
fn test_page_count_matches_successful_reads() {
    let pdf = open(three_pages());
    let successful = (0..pdf.page_count())
        .filter(|&i| pdf.read_page(i).is_ok())
        .count();
    assert_eq!(pdf.page_count(), 3);
    assert_eq!(successful, pdf.page_count());
}

#[test]
fn test_read_all_is_join_of_pages() {
    let pdf = open(three_pages());
    let pages: Vec<String> = (0..pdf.page_count())
        .map(|i| pdf.read_page(i).unwrap())
        .collect();

    assert_eq!(pdf.read_all().unwrap(), pages.join("\n\n"));
    assert_eq!(
        pdf.read_all().unwrap(),
        "First page\n\nSecond page\n\nThird page"
    );
}

#[test]
fn test_read_page_out_of_range() {
    let pdf = open(three_pages());
    for index in [3, 4, 100, usize::MAX] {
        let result = pdf.read_page(index);
        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange { count: 3, .. })
        ));
    }
}

#[test]
fn test_empty_document() {
    let pdf = open(MockBackend::new(vec![]));
    assert_eq!(pdf.page_count(), 0);
    assert_eq!(pdf.read_all().unwrap(), "");
    assert_eq!(pdf.read_all_parallel().unwrap(), "");
    assert!(matches!(
        pdf.read_page(0),
        Err(Error::IndexOutOfRange { index: 0, count: 0 })
    ));
}

#[test]
fn test_pages_iterator() {
    let pdf = open(three_pages());
    let texts: Vec<String> = pdf.pages().collect::<Result<_>>().unwrap();
    assert_eq!(texts, vec!["First page", "Second page", "Third page"]);
    assert_eq!(pdf.pages().len(), 3);

    let mut count = 0;
    for text in &pdf {
        assert!(text.unwrap().ends_with("page"));
        count += 1;
    }
    assert_eq!(count, 3);
}

#[test]
fn test_page_content_is_owned() {
    let content = {
        let pdf = open(three_pages());
        pdf.page_content(1).unwrap()
    };
    assert_eq!(content.runs().len(), 2);
    assert_eq!(content.runs()[0].text(), "Second");
}

// ==================== Layout Scenarios ====================

#[test]
fn test_hello_world_on_one_baseline() {
    let pdf = open(MockBackend::new(vec![page(vec![
        run("Hello", 0.0, 0.0),
        run(" World", 40.0, 0.0),
    ])]));
    assert_eq!(pdf.read_page(0).unwrap(), "Hello World");
}

#[test]
fn test_two_lines_regardless_of_input_order() {
    let options = ExtractOptions::new().with_layout(LayoutConfig::new().with_line_tolerance(5.0));
    let backend = MockBackend::new(vec![page(vec![
        run("second line", 0.0, 20.0),
        run("first line", 0.0, 0.0),
    ])]);
    let pdf = Pdf::from_backend(backend, options).unwrap();
    assert_eq!(pdf.read_page(0).unwrap(), "first line\nsecond line");
}

#[test]
fn test_physical_output_is_deterministic() {
    let pdf = open(MockBackend::new(vec![page(vec![
        run("b", 50.0, 0.0),
        run("c", 0.0, 30.0),
        run("a", 0.0, 0.0),
        run("d", 50.0, 30.5),
    ])]));
    let first = pdf.read_page(0).unwrap();
    for _ in 0..10 {
        assert_eq!(pdf.read_page(0).unwrap(), first);
    }
    assert_eq!(first, "a b\nc d");
}

#[test]
fn test_raw_mode_ignores_page_rect() {
    let runs = vec![run("Zed\n", 0.0, 50.0), run("Alpha", 0.0, 0.0)];
    let rects = [
        Rect::new(0.0, 0.0, 612.0, 792.0),
        Rect::new(100.0, -5.0, 10.0, 50.0),
        Rect::new(f32::NAN, f32::INFINITY, -1.0, 0.0),
        Rect::new(1000.0, 1000.0, 2000.0, 2000.0),
    ];

    let texts: Vec<String> = rects
        .iter()
        .map(|rect| {
            let backend = MockBackend::new(vec![PageContent::new(*rect, runs.clone())]);
            let pdf = Pdf::from_backend(backend, ExtractOptions::new().raw()).unwrap();
            assert_eq!(pdf.layout_mode(), LayoutMode::Raw);
            pdf.read_page(0).unwrap()
        })
        .collect();

    assert!(texts.iter().all(|t| t == "Zed\nAlpha"));
}

#[test]
fn test_degenerate_page_rect_keeps_runs() {
    let rect = Rect::new(100.0, -5.0, 10.0, 50.0);
    let runs = vec![
        run("top", -4.0, 4.0),
        run("middle", 10.0, 25.0),
        run("bottom", 40.0, 47.0),
    ];
    let backend = MockBackend::new(vec![PageContent::new(rect, runs)]);
    let pdf = open(backend);
    assert_eq!(pdf.read_page(0).unwrap(), "top\nmiddle\nbottom");
}

// ==================== Errors ====================

#[test]
fn test_corrupt_page_is_page_read_error() {
    let pdf = open(three_pages().with_corrupt_page(1));

    assert!(pdf.read_page(0).is_ok());
    match pdf.read_page(1) {
        Err(Error::PageRead { page, reason }) => {
            assert_eq!(page, 1);
            assert!(reason.contains("corrupt page object 1"));
        }
        other => panic!("Expected PageRead, got {:?}", other),
    }
}

#[test]
fn test_read_all_fails_fast() {
    let pdf = open(three_pages().with_corrupt_page(1).with_corrupt_page(2));
    assert!(matches!(
        pdf.read_all(),
        Err(Error::PageRead { page: 1, .. })
    ));
}

#[test]
fn test_read_all_lenient_substitutes_empty_pages() {
    let backend = three_pages().with_corrupt_page(1);
    let pdf = Pdf::from_backend(backend, ExtractOptions::new().lenient()).unwrap();
    assert_eq!(pdf.read_all().unwrap(), "First page\n\n\n\nThird page");
    // Single-page reads still report the failure
    assert!(pdf.read_page(1).is_err());
}

#[test]
fn test_load_failure_is_parse_error() {
    let result = Pdf::<MockBackend>::load_with_options(b"garbage", ExtractOptions::default());
    assert!(matches!(result, Err(Error::Parse(_))));

    let pdf = Pdf::<MockBackend>::load_with_options(b"MOCK", ExtractOptions::default()).unwrap();
    assert_eq!(pdf.read_all().unwrap(), "loaded");
}

// ==================== Encryption ====================

#[test]
fn test_encrypted_without_password_fails() {
    let result = Pdf::from_backend(three_pages().encrypted("secret"), ExtractOptions::default());
    assert!(matches!(result, Err(Error::Unlock)));
}

#[test]
fn test_encrypted_with_wrong_password_fails() {
    let options = ExtractOptions::new().with_password("guess");
    let result = Pdf::from_backend(three_pages().encrypted("secret"), options);
    assert!(matches!(result, Err(Error::Unlock)));
}

#[test]
fn test_encrypted_with_correct_password_opens() {
    let options = ExtractOptions::new().with_password("secret");
    let pdf = Pdf::from_backend(three_pages().encrypted("secret"), options).unwrap();
    assert_eq!(pdf.page_count(), 3);
    assert_eq!(pdf.read_page(2).unwrap(), "Third page");
}

#[test]
fn test_password_ignored_when_not_encrypted() {
    let options = ExtractOptions::new().with_password("unused");
    let pdf = Pdf::from_backend(three_pages(), options).unwrap();
    assert_eq!(pdf.page_count(), 3);
}

// ==================== Lifecycle ====================

#[test]
fn test_closed_document_rejects_reads() {
    let mut pdf = open(three_pages());
    assert!(!pdf.is_closed());

    pdf.close();
    assert!(pdf.is_closed());
    assert!(matches!(pdf.read_page(0), Err(Error::DocumentClosed)));
    assert!(matches!(pdf.read_all(), Err(Error::DocumentClosed)));
    assert!(matches!(pdf.read_all_parallel(), Err(Error::DocumentClosed)));
    assert!(matches!(pdf.page_content(0), Err(Error::DocumentClosed)));
    assert!(matches!(
        pdf.read_pages(&PageSelection::All),
        Err(Error::DocumentClosed)
    ));

    // Idempotent; page count stays fixed
    pdf.close();
    assert_eq!(pdf.page_count(), 3);
}

#[test]
fn test_closed_empty_document_rejects_read_all() {
    let mut pdf = open(MockBackend::new(vec![]));
    pdf.close();
    assert!(matches!(pdf.read_all(), Err(Error::DocumentClosed)));
}

// ==================== Selection and Parallelism ====================

#[test]
fn test_read_pages_selection() {
    let pdf = open(three_pages());

    let pages = pdf.read_pages(&PageSelection::parse("1,3").unwrap()).unwrap();
    assert_eq!(
        pages,
        vec![(1, "First page".to_string()), (3, "Third page".to_string())]
    );

    let all = pdf.read_pages(&PageSelection::All).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[1], (2, "Second page".to_string()));
}

#[test]
fn test_read_pages_beyond_count() {
    let pdf = open(three_pages());
    let result = pdf.read_pages(&PageSelection::Range(2..=4));
    assert!(matches!(
        result,
        Err(Error::IndexOutOfRange { index: 3, count: 3 })
    ));
}

#[test]
fn test_read_pages_huge_range_fails_before_reading() {
    // Page 2 is corrupt; the bounds check must win before any page is read
    let pdf = open(
        MockBackend::new(vec![
            page(vec![run("ok", 10.0, 20.0)]),
            page(vec![run("bad", 10.0, 20.0)]),
        ])
        .with_corrupt_page(1),
    );

    let selection = PageSelection::parse("1,2-4000000000").unwrap();
    assert!(matches!(
        pdf.read_pages(&selection),
        Err(Error::IndexOutOfRange {
            index: 3_999_999_999,
            count: 2
        })
    ));
}

#[test]
fn test_parallel_matches_sequential() {
    let pages: Vec<PageContent> = (0..40)
        .map(|i| {
            page(vec![
                run(&format!("page {}", i), 10.0, 20.0),
                run("tail", 10.0, 40.0),
            ])
        })
        .collect();
    let pdf = open(MockBackend::new(pages));

    assert_eq!(pdf.read_all_parallel().unwrap(), pdf.read_all().unwrap());
}

#[test]
fn test_parallel_reports_lowest_failing_page() {
    let backend = MockBackend::new((0..20).map(|_| page(vec![run("x", 0.0, 0.0)])).collect())
        .with_corrupt_page(15)
        .with_corrupt_page(7);
    let pdf = open(backend);

    assert!(matches!(
        pdf.read_all_parallel(),
        Err(Error::PageRead { page: 7, .. })
    ));
}
