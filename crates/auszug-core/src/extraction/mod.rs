pub mod pdftotext;
pub mod table;

use crate::error::AuszugError;

/// A table recovered from one page: rows of cell strings. Cells may
/// contain embedded line breaks when a visual row wraps.
pub type Table = Vec<Vec<String>>;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub page_number: usize,
    /// Text in reading order.
    pub lines: Vec<String>,
    /// Text with column alignment preserved by whitespace.
    pub layout_lines: Vec<String>,
    /// Grid of the transaction table, if the page has one.
    pub table: Option<Table>,
}

impl PageContent {
    /// Build a page whose reading-order and layout text are the same lines.
    /// The table grid is reconstructed from the layout text.
    pub fn from_lines(page_number: usize, lines: Vec<String>) -> Self {
        let table = table::reconstruct_table(&lines);
        PageContent {
            page_number,
            layout_lines: lines.clone(),
            lines,
            table,
        }
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, AuszugError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
