pub mod detect;
pub mod deutsche_bank;
pub mod ing;
pub mod sparkasse;

use crate::config::EngineConfig;
use crate::error::AuszugError;
use crate::extraction::PageContent;
use crate::model::{BankFormat, Transaction};

impl BankFormat {
    /// Run this format's engine over the document.
    ///
    /// Returns the transactions in document order; an empty vector means the
    /// layout was recognised but held no bookings.
    pub fn extract(
        &self,
        pages: &[PageContent],
        config: &EngineConfig,
    ) -> Result<Vec<Transaction>, AuszugError> {
        match self {
            BankFormat::Sparkasse => sparkasse::extract(pages, config),
            BankFormat::Ing => ing::extract(pages, config),
            BankFormat::DeutscheBank => deutsche_bank::extract(pages, config),
        }
    }
}
