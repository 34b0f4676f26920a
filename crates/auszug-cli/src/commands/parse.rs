use auszug_core::error::AuszugError;
use auszug_core::export::write_csv;
use auszug_core::extraction::pdftotext::PdftotextExtractor;
use auszug_core::model::FormatSelector;
use std::path::PathBuf;

use crate::output;

pub fn run(
    pdf_file: PathBuf,
    format: &str,
    output_format: &str,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<(), AuszugError> {
    let selector: FormatSelector = format.parse()?;
    let config = super::engine_config(config_file.as_deref())?;
    tracing::debug!(file = %pdf_file.display(), %selector, "parsing statement");

    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let statement = auszug_core::extract_pdf(&pdf_bytes, &extractor, selector, &config)?;

    match output_file {
        Some(path) => {
            // JSON unless the file asks for CSV
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv {
                let file = std::fs::File::create(&path)?;
                write_csv(&statement.transactions, file, &config.remark_separator)?;
            } else {
                std::fs::write(&path, serde_json::to_string_pretty(&statement)?)?;
            }
            eprintln!(
                "Extracted {} transaction(s) ({}), written to {}",
                statement.transactions.len(),
                statement.format,
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&statement)?,
            "csv" => write_csv(
                &statement.transactions,
                std::io::stdout().lock(),
                &config.remark_separator,
            )?,
            _ => output::table::print_statement(&statement, &config.remark_separator),
        },
    }

    Ok(())
}
