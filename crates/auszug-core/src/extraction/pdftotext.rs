use crate::error::AuszugError;
use crate::extraction::table::reconstruct_table;
use crate::extraction::{PageContent, PdfExtractor};
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Runs pdftotext twice: once in reading order for the free-text layouts
/// and once with `-layout` so column spacing survives for the
/// tokenized and table layouts.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, AuszugError> {
        // Write PDF bytes to a temp file
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| AuszugError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| AuszugError::Extraction(e.to_string()))?;
        let tmp_path = tmpfile.path().to_path_buf();

        let plain = run_pdftotext(&tmp_path, false)?;
        let layout = run_pdftotext(&tmp_path, true)?;

        let pages = assemble_pages(split_pages(&plain), split_pages(&layout));
        tracing::debug!(pages = pages.len(), "pdftotext extracted pages");
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

fn run_pdftotext(pdf_path: &Path, layout: bool) -> Result<String, AuszugError> {
    let mut cmd = Command::new("pdftotext");
    if layout {
        cmd.arg("-layout");
    }
    let output = cmd
        .arg(pdf_path)
        .arg("-") // output to stdout
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AuszugError::PdftotextNotFound
            } else {
                AuszugError::Extraction(format!("pdftotext failed: {}", e))
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(AuszugError::PdftotextFailed { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Split pdftotext output into pages (form feed `\x0c` separates pages).
fn split_pages(text: &str) -> Vec<Vec<String>> {
    let mut pages: Vec<Vec<String>> = text
        .split('\x0c')
        .map(|page_text| page_text.lines().map(|l| l.trim_end().to_string()).collect())
        .collect();

    // pdftotext terminates the last page with a form feed too
    while pages.len() > 1 && pages.last().is_some_and(|p| p.iter().all(|l| l.trim().is_empty())) {
        pages.pop();
    }

    pages
}

/// Pair reading-order and layout text page by page.
fn assemble_pages(plain: Vec<Vec<String>>, layout: Vec<Vec<String>>) -> Vec<PageContent> {
    let count = plain.len().max(layout.len());
    let mut plain = plain.into_iter();
    let mut layout = layout.into_iter();

    (0..count)
        .map(|i| {
            let lines: Vec<String> = plain
                .next()
                .unwrap_or_default()
                .into_iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
            let layout_lines = layout.next().unwrap_or_default();
            let table = reconstruct_table(&layout_lines);
            PageContent {
                page_number: i + 1,
                lines,
                layout_lines,
                table,
            }
        })
        .collect()
}
