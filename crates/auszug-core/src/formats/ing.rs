//! Column text layout: a booking line `DATE TYPE COUNTERPARTY AMOUNT`,
//! optionally followed by a line carrying the value date, then free-text
//! purpose lines.
//!
//! Every page is self-contained: a transaction still open at the end of a
//! page is closed before the next page is read.
//!
//! The line after a booking line is always offered to the value-date
//! lookahead, even when it is itself a booking line: its date becomes the
//! value date and the rest of it a remark.

use crate::config::EngineConfig;
use crate::error::AuszugError;
use crate::extraction::PageContent;
use crate::model::Transaction;
use crate::parsing::dates::{
    find_date_token, is_booking_date_token, normalize_date, parse_date, render_date,
};
use crate::parsing::keywords::{
    contains_any, starts_with_any, ING_EXCLUDE, ING_SKIP, ING_SKIP_PREFIXES, ING_TABLE_END,
    ING_TABLE_START, ING_TRANSACTION_TYPES,
};
use crate::parsing::parse_amount;
use crate::parsing::text::truncate_chars;
use chrono::Datelike;
use rust_decimal::Decimal;

pub fn is_skip_line(line: &str) -> bool {
    contains_any(line, ING_SKIP) || starts_with_any(line, ING_SKIP_PREFIXES)
}

/// First token is a full `DD.MM.YYYY` date and there is room for text and
/// an amount.
pub fn is_booking_line(line: &str) -> bool {
    let parts: Vec<&str> = line.split_whitespace().collect();
    parts.len() >= 3 && is_booking_date_token(parts[0])
}

/// Lines between the column header and the closing summary, trimmed and
/// non-empty. None when the page has no column header.
fn table_lines(layout_lines: &[String]) -> Option<Vec<&str>> {
    let mut in_table = false;
    let mut out = Vec::new();

    for line in layout_lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();

        if ING_TABLE_START.iter().any(|kw| lower.contains(kw)) || lower.starts_with("valuta") {
            in_table = true;
            continue;
        }

        if in_table && ING_TABLE_END.iter().any(|kw| lower.contains(kw)) {
            tracing::debug!(line, "end of transaction table");
            break;
        }

        if in_table {
            out.push(line);
        }
    }

    in_table.then_some(out)
}

/// Split explanatory text into (transaction type, counterparty).
///
/// Leading tokens naming a known type belong to the type; once a type was
/// seen, tokens containing a type label join it too. Everything else is
/// the counterparty. With no type token at all, the whole text is the type.
pub fn split_type_and_counterparty(text: &str) -> (String, String) {
    let mut type_words = Vec::new();
    let mut counterparty_words = Vec::new();
    let mut in_type = false;

    for word in text.split_whitespace() {
        let clean = word.trim_matches(|c: char| c == ' ' || c == '-').to_lowercase();

        if ING_TRANSACTION_TYPES.iter().any(|kw| *kw == clean) {
            in_type = true;
            type_words.push(word);
            continue;
        }

        if in_type && ING_TRANSACTION_TYPES.iter().any(|kw| clean.contains(kw)) {
            type_words.push(word);
            continue;
        }

        counterparty_words.push(word);
    }

    let transaction_type = type_words.join(" ");
    let counterparty = counterparty_words.join(" ");

    if transaction_type.is_empty() && !counterparty.is_empty() {
        (counterparty, String::new())
    } else {
        (transaction_type, counterparty)
    }
}

#[derive(Debug)]
struct PendingTransaction {
    date: String,
    value_date: Option<String>,
    amount: Decimal,
    explanatory: String,
    transaction_type: String,
    counterparty: String,
    remarks: Vec<String>,
}

impl PendingTransaction {
    /// Parse a booking line. An unparseable amount means the line is not a
    /// booking after all.
    fn open(line: &str) -> Result<Self, AuszugError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (first, rest) = parts
            .split_first()
            .ok_or_else(|| AuszugError::MalformedLine(line.to_string()))?;
        let (last, middle) = rest
            .split_last()
            .ok_or_else(|| AuszugError::MalformedLine(line.to_string()))?;

        let amount = parse_amount(last)?;
        let explanatory = middle.join(" ");
        let (transaction_type, counterparty) = split_type_and_counterparty(&explanatory);

        Ok(PendingTransaction {
            date: first.to_string(),
            value_date: None,
            amount,
            explanatory,
            transaction_type,
            counterparty,
            remarks: Vec::new(),
        })
    }

    /// Take the value date from the line after the booking line. Returns
    /// whether the line was consumed.
    fn try_value_date(&mut self, line: &str) -> bool {
        let Some(token) = find_date_token(line) else {
            return false;
        };
        self.value_date = Some(token.to_string());
        let rest = line.replacen(token, "", 1);
        let rest = rest.trim();
        if !rest.is_empty() {
            self.remarks.push(rest.to_string());
        }
        true
    }

    /// Summary rows (balances, interest, closing) look like bookings but
    /// are not.
    fn is_valid(&self) -> bool {
        !self.date.is_empty() && !contains_any(&self.explanatory, ING_EXCLUDE)
    }

    fn finish(self, config: &EngineConfig) -> Transaction {
        let booking = parse_date(&self.date, None);
        let booking_date = booking.map_or_else(|| self.date.clone(), render_date);
        let value_date = match self.value_date {
            Some(token) => normalize_date(&token, booking.map(|d| d.year())).unwrap_or(token),
            None => booking_date.clone(),
        };
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

        Transaction {
            booking_date,
            value_date,
            amount: self.amount,
            description: truncate_chars(&self.explanatory, config.max_description_len),
            counterparty: non_empty(self.counterparty),
            transaction_type: non_empty(self.transaction_type),
            remarks: self.remarks,
        }
    }
}

fn seal(current: &mut Option<PendingTransaction>, out: &mut Vec<Transaction>, config: &EngineConfig) {
    if let Some(pending) = current.take() {
        if pending.is_valid() {
            out.push(pending.finish(config));
        } else {
            tracing::debug!(text = %pending.explanatory, "dropping summary row");
        }
    }
}

/// Extract all transactions from an ING statement.
pub fn extract(pages: &[PageContent], config: &EngineConfig) -> Result<Vec<Transaction>, AuszugError> {
    let mut transactions = Vec::new();
    let mut found_table = false;

    for page in pages {
        let mut current: Option<PendingTransaction> = None;
        let Some(lines) = table_lines(&page.layout_lines) else {
            tracing::debug!(page = page.page_number, "no transaction table on page");
            continue;
        };
        found_table = true;

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];

            if is_skip_line(line) {
                tracing::debug!(page = page.page_number, line, "skipping header/footer line");
                i += 1;
                continue;
            }

            if is_booking_line(line) {
                match PendingTransaction::open(line) {
                    Ok(mut pending) => {
                        seal(&mut current, &mut transactions, config);

                        // one-line lookahead for the value date
                        let next = lines.get(i + 1).copied().filter(|next| !is_skip_line(next));
                        let consumed = next.is_some_and(|next| pending.try_value_date(next));
                        current = Some(pending);
                        i += if consumed { 2 } else { 1 };
                        continue;
                    }
                    Err(e) => {
                        tracing::debug!(line, error = %e, "booking line without amount, treating as text");
                    }
                }
            }

            if let Some(pending) = current.as_mut() {
                pending.remarks.push(line.to_string());
            }
            i += 1;
        }

        seal(&mut current, &mut transactions, config);
    }

    if !found_table {
        return Err(AuszugError::HeaderNotFound { format: "ing".into() });
    }

    tracing::debug!(count = transactions.len(), "ing extraction finished");
    Ok(transactions)
}
