use crate::config::EngineConfig;
use crate::error::AuszugError;
use crate::extraction::PageContent;
use crate::model::{BankFormat, Statement, Transaction};

/// Outcome of running one format engine during auto-detection.
#[derive(Debug)]
pub struct Candidate {
    pub format: BankFormat,
    pub result: Result<Vec<Transaction>, AuszugError>,
}

impl Candidate {
    /// Transaction count; a failed engine counts as zero.
    pub fn count(&self) -> usize {
        self.result.as_ref().map_or(0, |txs| txs.len())
    }
}

/// Every engine's outcome, in priority order.
#[derive(Debug)]
pub struct DetectionReport {
    pub candidates: Vec<Candidate>,
}

impl DetectionReport {
    /// Index of the winning candidate: the strictly greatest count, the
    /// earlier candidate on a tie. None when every count is zero.
    fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (i, candidate) in self.candidates.iter().enumerate() {
            let count = candidate.count();
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((i, count));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn best(&self) -> Option<BankFormat> {
        self.best_index().map(|i| self.candidates[i].format)
    }

    pub fn into_statement(mut self) -> Result<Statement, AuszugError> {
        let idx = self.best_index().ok_or(AuszugError::FormatUndetermined)?;
        let candidate = self.candidates.swap_remove(idx);
        let transactions = candidate.result?;
        Ok(Statement {
            format: candidate.format,
            transactions,
        })
    }
}

/// Run every format engine against the same pages.
///
/// Engines share no state; each gets a fresh accumulator. Errors are kept
/// in the report but count as zero transactions.
pub fn detect(pages: &[PageContent], config: &EngineConfig) -> DetectionReport {
    let candidates = BankFormat::ALL
        .iter()
        .map(|&format| {
            let result = format.extract(pages, config);
            match &result {
                Ok(txs) => tracing::debug!(%format, count = txs.len(), "candidate format"),
                Err(e) => tracing::debug!(%format, error = %e, "candidate format failed"),
            }
            Candidate { format, result }
        })
        .collect();

    DetectionReport { candidates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn txs(n: usize) -> Vec<Transaction> {
        (0..n)
            .map(|i| Transaction {
                booking_date: format!("{:02}.01.2025", i + 1),
                value_date: format!("{:02}.01.2025", i + 1),
                amount: dec!(-1.00),
                description: format!("Buchung {i}"),
                counterparty: None,
                transaction_type: None,
                remarks: Vec::new(),
            })
            .collect()
    }

    fn report(outcomes: Vec<(BankFormat, Result<Vec<Transaction>, AuszugError>)>) -> DetectionReport {
        DetectionReport {
            candidates: outcomes
                .into_iter()
                .map(|(format, result)| Candidate { format, result })
                .collect(),
        }
    }

    #[test]
    fn test_single_nonzero_wins() {
        let r = report(vec![
            (BankFormat::Sparkasse, Ok(vec![])),
            (BankFormat::Ing, Err(AuszugError::HeaderNotFound { format: "ing".into() })),
            (BankFormat::DeutscheBank, Ok(txs(3))),
        ]);
        assert_eq!(r.best(), Some(BankFormat::DeutscheBank));
        let statement = r.into_statement().unwrap();
        assert_eq!(statement.format, BankFormat::DeutscheBank);
        assert_eq!(statement.transactions.len(), 3);
    }

    #[test]
    fn test_tie_goes_to_priority_order() {
        for _ in 0..5 {
            let r = report(vec![
                (BankFormat::Sparkasse, Ok(txs(1))),
                (BankFormat::Ing, Ok(txs(4))),
                (BankFormat::DeutscheBank, Ok(txs(4))),
            ]);
            assert_eq!(r.best(), Some(BankFormat::Ing));
        }
    }

    #[test]
    fn test_all_zero_is_undetermined() {
        let r = report(vec![
            (BankFormat::Sparkasse, Ok(vec![])),
            (BankFormat::Ing, Err(AuszugError::HeaderNotFound { format: "ing".into() })),
            (BankFormat::DeutscheBank, Err(AuszugError::MalformedLine("x".into()))),
        ]);
        assert_eq!(r.best(), None);
        assert!(matches!(r.into_statement(), Err(AuszugError::FormatUndetermined)));
    }

    #[test]
    fn test_detect_runs_every_format() {
        let pages = vec![PageContent::default()];
        let r = detect(&pages, &EngineConfig::default());
        let formats: Vec<BankFormat> = r.candidates.iter().map(|c| c.format).collect();
        assert_eq!(formats, BankFormat::ALL.to_vec());
        assert!(r.candidates.iter().all(|c| c.count() == 0));
    }
}
