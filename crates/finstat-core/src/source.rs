//! Page text sources consumed by the statement extractor.

use crate::error::Result;

/// Page separator in plain-text statement dumps.
pub const FORM_FEED: char = '\u{000c}';

/// Trait for collaborators supplying the ordered page texts of a document.
pub trait PageSource {
    /// Text of every page, in page order.
    fn page_texts(&self) -> Result<Vec<String>>;
}

/// Plain-text document with pages separated by form feeds.
#[derive(Debug, Clone, Default)]
pub struct TextPages {
    text: String,
}

impl TextPages {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a text document from disk.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }

    /// Split the document into pages. A document without form feeds is a
    /// single page; a trailing form feed does not open an extra page.
    pub fn pages(&self) -> Vec<&str> {
        let text = self.text.strip_suffix(FORM_FEED).unwrap_or(&self.text);
        text.split(FORM_FEED).collect()
    }
}

impl PageSource for TextPages {
    fn page_texts(&self) -> Result<Vec<String>> {
        Ok(self.pages().into_iter().map(String::from).collect())
    }
}

/// The first lines of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    /// Page number (1-indexed).
    pub page: usize,
    /// Up to `n` leading lines of the page.
    pub lines: Vec<String>,
}

/// Collect the first `n_lines` lines of every page.
pub fn page_headers<S: AsRef<str>>(pages: &[S], n_lines: usize) -> Vec<PageHeader> {
    pages
        .iter()
        .enumerate()
        .map(|(idx, page)| PageHeader {
            page: idx + 1,
            lines: page
                .as_ref()
                .split('\n')
                .take(n_lines)
                .map(|l| l.trim_end_matches('\r').to_string())
                .collect(),
        })
        .collect()
}
