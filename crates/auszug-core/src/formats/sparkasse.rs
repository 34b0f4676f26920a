//! Table-grid layout: each page yields a date / description / amount grid
//! whose cells may wrap over several sub-lines.

use crate::config::EngineConfig;
use crate::error::AuszugError;
use crate::extraction::PageContent;
use crate::model::Transaction;
use crate::parsing::dates::{day_month, parse_date, render_date, YearTracker};
use crate::parsing::parse_amount;
use crate::parsing::text::{collapse_whitespace, truncate_chars};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// One logical sub-line of a grid row, after splitting wrapped cells.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SubLine<'a> {
    date: &'a str,
    description: &'a str,
    amount: &'a str,
}

/// Split the first three cells on line breaks and pad them to equal
/// length so they can be walked in lockstep.
fn sub_lines(row: &[String]) -> Vec<SubLine<'_>> {
    let dates = split_cell(&row[0]);
    let descriptions = split_cell(&row[1]);
    let amounts = split_cell(&row[2]);

    let len = dates.len().max(descriptions.len()).max(amounts.len());
    (0..len)
        .map(|i| SubLine {
            date: dates.get(i).copied().unwrap_or("").trim(),
            description: descriptions.get(i).copied().unwrap_or("").trim(),
            amount: amounts.get(i).copied().unwrap_or("").trim(),
        })
        .collect()
}

fn split_cell(cell: &str) -> Vec<&str> {
    if cell.is_empty() {
        Vec::new()
    } else {
        cell.split('\n').collect()
    }
}

/// Calendar date of a date cell. Cells without a year take the running
/// year; the year state only moves for a valid date.
fn booking_date(cell: &str, years: &mut YearTracker) -> Option<NaiveDate> {
    let (_, month) = day_month(cell)?;
    let explicit_year = parse_date(cell, None).map(|d| d.year());
    let date = parse_date(cell, Some(years.peek(month, explicit_year)))?;
    years.resolve(month, explicit_year);
    Some(date)
}

#[derive(Debug)]
struct PendingTransaction {
    date: NaiveDate,
    description: String,
    amount: Decimal,
    remarks: Vec<String>,
}

impl PendingTransaction {
    fn finish(self, config: &EngineConfig) -> Transaction {
        let booking_date = render_date(self.date);
        Transaction {
            value_date: booking_date.clone(),
            booking_date,
            amount: self.amount,
            description: truncate_chars(&collapse_whitespace(&self.description), config.max_description_len),
            counterparty: None,
            transaction_type: None,
            remarks: self.remarks,
        }
    }
}

/// Extract all transactions from a Sparkasse statement.
pub fn extract(pages: &[PageContent], config: &EngineConfig) -> Result<Vec<Transaction>, AuszugError> {
    let mut transactions = Vec::new();
    let mut current: Option<PendingTransaction> = None;
    let mut found_table = false;
    let mut years = YearTracker::new(config.seed_year());

    for page in pages {
        let table = match &page.table {
            Some(table) if table.len() >= 2 => table,
            _ => {
                tracing::debug!(page = page.page_number, "no table on page");
                continue;
            }
        };
        found_table = true;

        // header row first
        for row in table.iter().skip(1) {
            if row.len() < 3 {
                continue;
            }

            for sub in sub_lines(row) {
                let amount = if sub.amount.is_empty() {
                    None
                } else {
                    parse_amount(sub.amount).ok()
                };
                let date = match amount {
                    Some(_) if !sub.date.is_empty() => booking_date(sub.date, &mut years),
                    _ => None,
                };

                match (date, amount) {
                    (Some(date), Some(amount)) => {
                        if let Some(pending) = current.take() {
                            transactions.push(pending.finish(config));
                        }
                        current = Some(PendingTransaction {
                            date,
                            description: sub.description.to_string(),
                            amount,
                            remarks: Vec::new(),
                        });
                    }
                    (_, None) if sub.date.is_empty() && !sub.description.is_empty() => {
                        if let Some(pending) = current.as_mut() {
                            pending.remarks.push(collapse_whitespace(sub.description));
                        }
                    }
                    _ => {
                        tracing::debug!(
                            page = page.page_number,
                            date = sub.date,
                            description = sub.description,
                            amount = sub.amount,
                            "ignoring table sub-line"
                        );
                    }
                }
            }
        }
    }

    if !found_table {
        return Err(AuszugError::HeaderNotFound {
            format: "sparkasse".into(),
        });
    }

    if let Some(pending) = current.take() {
        transactions.push(pending.finish(config));
    }

    tracing::debug!(count = transactions.len(), "sparkasse extraction finished");
    Ok(transactions)
}
