//! Citation scanner for plain-text documents
//!
//! Documents are paginated text: every page ends with a footer line such as
//! `Barr                         Informational                     [Page 3]`.
//! The scanner reads the body one line at a time, buffers the lines of the current
//! page, and scans the page for citation markers like `[RFC 1912]` once its footer is
//! seen. Only one page is ever held in memory.
//!
//! Anything after the last page footer is dropped without being scanned, so citations
//! on an unterminated final page are not guaranteed to be found. Citations are not
//! deduplicated here; the frontier filters repeats.

use crate::config::ReferenceConfig;
use regex::Regex;
use std::io;
use std::sync::LazyLock;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// A citation marker: `[`, optional space, `RFC`, whitespace, digits, optional space, `]`
///
/// Digits and whitespace are ASCII only.
static CITATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)\[\s?RFC\s+([0-9]+)\s?\]").expect("Invalid citation regex")
});

/// A page footer line ends with `[Page N]`, ASCII digits only
static PAGE_END_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)\[Page [0-9]+\]$").expect("Invalid page end regex"));

/// Citation patterns plus the identifier-to-URL template
#[derive(Debug, Clone)]
pub struct ReferencePatterns {
    base_url: String,
}

impl ReferencePatterns {
    /// Cited documents resolve to `{base_url}rfc{id}.txt`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &ReferenceConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    /// Returns the identifier of every citation marker in `text`, in order
    pub fn extract_references<'t>(&self, text: &'t str) -> Vec<&'t str> {
        CITATION_PATTERN
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .map(|id| id.as_str())
            .collect()
    }

    /// Returns true if `line` closes a logical page
    pub fn is_page_end(&self, line: &str) -> bool {
        PAGE_END_PATTERN.is_match(line)
    }

    /// Maps a document identifier to the URL it is fetched from
    pub fn reference_url(&self, id: &str) -> String {
        format!("{}rfc{}.txt", self.base_url, id)
    }
}

/// Reassembles logical pages from lines and yields the URLs each page cites
#[derive(Debug)]
pub struct ReferenceExtractor<'a> {
    patterns: &'a ReferencePatterns,
    page: String,
    pages: usize,
}

impl<'a> ReferenceExtractor<'a> {
    pub fn new(patterns: &'a ReferencePatterns) -> Self {
        Self {
            patterns,
            page: String::new(),
            pages: 0,
        }
    }

    /// Appends one line (without its terminator) to the current page
    ///
    /// Returns the cited URLs when `line` ends the page, and an empty list otherwise.
    /// Lines are joined without a separator, so a marker wrapped onto an indented
    /// continuation line still matches.
    pub fn push_line(&mut self, line: &str) -> Vec<String> {
        self.page.push_str(line);

        if !self.patterns.is_page_end(line) {
            return Vec::new();
        }

        let urls = self
            .patterns
            .extract_references(&self.page)
            .into_iter()
            .map(|id| self.patterns.reference_url(id))
            .collect();

        self.page.clear();
        self.pages += 1;
        urls
    }

    /// Number of complete pages scanned so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Ends the document, returning how many buffered bytes were dropped unscanned
    pub fn finish(self) -> usize {
        self.page.len()
    }
}

/// Totals for one scanned document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub lines: usize,
    pub pages: usize,
    pub references: usize,
    pub dropped_bytes: usize,
}

/// Streams `reader` through a `ReferenceExtractor`
///
/// `on_page` is called once per page that cites anything, with that page's URLs.
/// Invalid UTF-8 is replaced rather than rejected and a trailing `\r` is stripped from
/// every line.
pub async fn scan_body<R, F>(
    patterns: &ReferencePatterns,
    reader: R,
    mut on_page: F,
) -> io::Result<ScanReport>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(Vec<String>),
{
    let mut extractor = ReferenceExtractor::new(patterns);
    let mut report = ScanReport::default();
    let mut lines = reader.split(b'\n');

    while let Some(segment) = lines.next_segment().await? {
        report.lines += 1;

        let line = String::from_utf8_lossy(&segment);
        let line: &str = &line;
        let urls = extractor.push_line(line.strip_suffix('\r').unwrap_or(line));

        if !urls.is_empty() {
            report.references += urls.len();
            on_page(urls);
        }
    }

    report.pages = extractor.pages();
    report.dropped_bytes = extractor.finish();
    Ok(report)
}
