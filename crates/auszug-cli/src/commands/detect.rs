use auszug_core::error::AuszugError;
use auszug_core::extraction::pdftotext::PdftotextExtractor;
use auszug_core::extraction::PdfExtractor;
use auszug_core::formats::detect::detect;
use std::path::PathBuf;

use crate::output;

pub fn run(pdf_file: PathBuf, config_file: Option<PathBuf>) -> Result<(), AuszugError> {
    let config = super::engine_config(config_file.as_deref())?;
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let pages = PdftotextExtractor::new().extract_pages(&pdf_bytes)?;

    let report = detect(&pages, &config);
    output::table::print_detection(&report);
    Ok(())
}
