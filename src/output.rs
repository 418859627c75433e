//! Result types produced by the conversion pipeline.

use std::path::PathBuf;

/// Text recognised on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 0-based position of the page in the PDF.
    pub index: usize,
    /// Raw recogniser output, possibly empty.
    pub text: String,
}

impl PageText {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// 1-indexed page number.
    pub fn page_num(&self) -> usize {
        self.index + 1
    }

    /// Markdown section for this page: a rule, a `## Page N` heading and the
    /// recognised text. The heading is present even when `text` is empty.
    pub fn section(&self) -> String {
        format!("\n\n---\n\n## Page {}\n{}", self.page_num(), self.text)
    }
}

/// All pages of one PDF, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateDocument {
    pages: Vec<PageText>,
}

impl AggregateDocument {
    /// Build a document from pages in any order; they are sorted by index.
    pub fn from_pages(mut pages: Vec<PageText>) -> Self {
        pages.sort_by_key(|p| p.index);
        Self { pages }
    }

    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total bytes of recognised text, headings excluded.
    pub fn text_len(&self) -> usize {
        self.pages.iter().map(|p| p.text.len()).sum()
    }

    /// Concatenated page sections.
    pub fn markdown(&self) -> String {
        self.pages.iter().map(PageText::section).collect()
    }
}

/// Timing and size figures for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub total_pages: usize,
    /// Bytes of OCR text sent for cleanup.
    pub ocr_chars: usize,
    pub render_duration_ms: u64,
    pub ocr_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// A finished conversion that has not been written anywhere yet.
///
/// The CLI shows `suggested_name` to the user, then hands the draft and the
/// confirmed name to [`crate::convert::save_draft`].
#[derive(Debug, Clone)]
pub struct ConversionDraft {
    /// The PDF the draft was produced from.
    pub source: PathBuf,
    /// `<pdf stem>_AI_formatted`.
    pub suggested_name: String,
    /// Cleaned-up Markdown returned by the AI, trimmed.
    pub markdown: String,
    pub stats: ConversionStats,
}
