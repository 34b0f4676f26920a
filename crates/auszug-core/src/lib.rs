pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod formats;
pub mod model;
pub mod parsing;

use config::EngineConfig;
use error::AuszugError;
use extraction::{PageContent, PdfExtractor};
use model::{FormatSelector, Statement};

/// Main API entry point: extract the transactions of a bank statement PDF.
///
/// Pages are read once through `extractor`, then handed to the selected
/// format engine (or to every engine when `selector` is `Auto`).
pub fn extract_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    selector: FormatSelector,
    config: &EngineConfig,
) -> Result<Statement, AuszugError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    tracing::info!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "pages extracted"
    );
    extract_statement(&pages, selector, config)
}

/// Extract transactions from already-extracted pages.
pub fn extract_statement(
    pages: &[PageContent],
    selector: FormatSelector,
    config: &EngineConfig,
) -> Result<Statement, AuszugError> {
    let statement = match selector {
        FormatSelector::Auto => formats::detect::detect(pages, config).into_statement()?,
        FormatSelector::Fixed(format) => {
            let transactions = format.extract(pages, config)?;
            if transactions.is_empty() {
                return Err(AuszugError::NoTransactionsFound {
                    format: format.to_string(),
                });
            }
            Statement {
                format,
                transactions,
            }
        }
    };

    tracing::info!(
        format = %statement.format,
        transactions = statement.transactions.len(),
        "statement extracted"
    );
    Ok(statement)
}
