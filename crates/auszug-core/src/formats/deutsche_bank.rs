//! Free-text layout: one transaction per block of lines, opened by a line
//! that starts with `DD.MM.` and ends with a signed amount.
//!
//! Dates carry no year, so the year is inferred while walking the
//! document (see [`YearTracker`]). A transaction may continue on the next
//! page; only a terminal footer or the next start line closes it.

use crate::config::EngineConfig;
use crate::error::AuszugError;
use crate::extraction::PageContent;
use crate::model::Transaction;
use crate::parsing::dates::{day_month, render_date, YearTracker, DATE_PREFIX_RE, SHORT_DATE_RE};
use crate::parsing::keywords::{
    contains_any, contains_any_exact, DB_PAGE_FOOTER, DB_TABLE_HEADER, DB_TECHNICAL,
    DB_TERMINAL_FOOTER,
};
use crate::parsing::text::{clean_text, truncate_chars};
use crate::parsing::parse_amount;
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

static AMOUNT_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+-])\s*(\d{1,3}(?:\.\d{3})*,\d{2})$").unwrap());
static LEADING_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}.?").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());
static YEAR_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(20\d{2}\s*)+$").unwrap());
static YEAR_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:20\d{2}\s+)+").unwrap());

/// A line opens a transaction iff it starts with a date and ends with a
/// signed amount. Both are required.
pub fn is_transaction_start(line: &str) -> bool {
    !line.is_empty() && DATE_PREFIX_RE.is_match(line) && AMOUNT_TAIL_RE.is_match(line)
}

pub fn is_page_footer(line: &str) -> bool {
    contains_any(line, DB_PAGE_FOOTER)
}

pub fn is_terminal_footer(line: &str) -> bool {
    contains_any(line, DB_TERMINAL_FOOTER)
}

/// Creditor IDs, mandate references, card numbers and similar metadata.
pub fn is_technical_line(line: &str) -> bool {
    contains_any_exact(line, DB_TECHNICAL)
}

fn is_table_header(line: &str) -> bool {
    DB_TABLE_HEADER.iter().all(|word| line.contains(word))
}

/// Fields of a start line before the year is known.
#[derive(Debug, Clone, PartialEq)]
struct StartLine {
    booking: (u32, u32),
    value: (u32, u32),
    amount: Decimal,
    description: String,
}

fn parse_start_line(line: &str) -> Result<StartLine, AuszugError> {
    let dates: Vec<regex::Match> = SHORT_DATE_RE.find_iter(line).collect();
    let (first, last) = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(AuszugError::MalformedLine(line.to_string())),
    };
    // a second date token is the value date
    let value_token = dates.get(1).unwrap_or(&first);

    let malformed = || AuszugError::MalformedLine(line.to_string());
    let booking = day_month(first.as_str())
        .filter(is_plausible)
        .ok_or_else(malformed)?;
    let value = day_month(value_token.as_str())
        .filter(is_plausible)
        .ok_or_else(malformed)?;

    let caps = AMOUNT_TAIL_RE
        .captures(line)
        .ok_or_else(|| AuszugError::MalformedAmount(line.to_string()))?;
    let amount = parse_amount(&format!("{}{}", &caps[1], &caps[2]))?;
    let amount_start = caps.get(0).map_or(line.len(), |m| m.start());

    let description = if last.end() < amount_start {
        line[last.end()..amount_start].trim()
    } else {
        ""
    };
    let description = LEADING_DATE_RE.replace(description, "");

    Ok(StartLine {
        booking,
        value,
        amount,
        description: clean_text(description.trim()),
    })
}

fn dated((day, month): (u32, u32), year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn is_plausible(day_month: &(u32, u32)) -> bool {
    (1..=31).contains(&day_month.0) && (1..=12).contains(&day_month.1)
}

#[derive(Debug)]
struct PendingTransaction {
    booking_date: String,
    value_date: String,
    amount: Decimal,
    parts: Vec<String>,
}

impl PendingTransaction {
    fn open(
        line: &str,
        explicit_year: Option<i32>,
        years: &mut YearTracker,
    ) -> Result<Self, AuszugError> {
        let start = parse_start_line(line)?;
        let booking_month = start.booking.1;

        // both dates must exist before the year state moves
        let year = years.peek(booking_month, explicit_year);
        let booking = dated(start.booking, year)
            .ok_or_else(|| AuszugError::MalformedLine(line.to_string()))?;
        let value = dated(start.value, year)
            .ok_or_else(|| AuszugError::MalformedLine(line.to_string()))?;
        years.resolve(booking_month, explicit_year);

        Ok(PendingTransaction {
            booking_date: render_date(booking),
            value_date: render_date(value),
            amount: start.amount,
            parts: vec![start.description],
        })
    }

    fn push_continuation(&mut self, line: &str) {
        if line.is_empty() || is_technical_line(line) || YEAR_NOISE_RE.is_match(line) {
            return;
        }
        let line = YEAR_PREFIX_RE.replace(line, "");
        if !line.is_empty() {
            self.parts.push(line.into_owned());
        }
    }

    fn finish(self, config: &EngineConfig) -> Transaction {
        let description = clean_text(&self.parts.join(" "));
        Transaction {
            booking_date: self.booking_date,
            value_date: self.value_date,
            amount: self.amount,
            description: truncate_chars(&description, config.max_description_len),
            counterparty: None,
            transaction_type: None,
            remarks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanLine<'a> {
    Text(&'a str),
    /// A terminal footer: whatever is open is complete.
    End,
}

/// Collect the transaction area of every page: the lines after the column
/// header, up to the page footer.
fn scan_lines(pages: &[PageContent]) -> Option<Vec<ScanLine<'_>>> {
    let mut found_header = false;
    let mut out = Vec::new();

    for page in pages {
        let Some(header_idx) = page.lines.iter().position(|l| is_table_header(l)) else {
            tracing::debug!(page = page.page_number, "no transaction header on page");
            continue;
        };
        found_header = true;

        for raw in &page.lines[header_idx + 1..] {
            let line = raw.trim();
            if is_terminal_footer(line) {
                out.push(ScanLine::End);
                break;
            }
            if is_page_footer(line) {
                tracing::debug!(page = page.page_number, line, "page footer reached");
                break;
            }
            out.push(ScanLine::Text(line));
        }
    }

    found_header.then_some(out)
}

/// Explicit year on the line right after a start line.
fn explicit_year(next: Option<&ScanLine<'_>>) -> Option<i32> {
    match next {
        Some(ScanLine::Text(line)) if !is_transaction_start(line) => YEAR_RE
            .captures(line)
            .and_then(|caps| caps[1].parse().ok()),
        _ => None,
    }
}

/// Extract all transactions from a Deutsche Bank statement.
pub fn extract(pages: &[PageContent], config: &EngineConfig) -> Result<Vec<Transaction>, AuszugError> {
    let lines = scan_lines(pages).ok_or_else(|| AuszugError::HeaderNotFound {
        format: "deutsche_bank".into(),
    })?;

    let mut years = YearTracker::new(config.seed_year());
    let mut transactions = Vec::new();
    let mut current: Option<PendingTransaction> = None;

    for (i, item) in lines.iter().enumerate() {
        match item {
            ScanLine::End => {
                if let Some(pending) = current.take() {
                    transactions.push(pending.finish(config));
                }
            }
            ScanLine::Text(line) if is_transaction_start(line) => {
                if let Some(pending) = current.take() {
                    transactions.push(pending.finish(config));
                }
                match PendingTransaction::open(line, explicit_year(lines.get(i + 1)), &mut years) {
                    Ok(pending) => current = Some(pending),
                    Err(e) => tracing::debug!(line, error = %e, "skipping unparseable start line"),
                }
            }
            ScanLine::Text(line) => {
                if let Some(pending) = current.as_mut() {
                    pending.push_continuation(line);
                }
            }
        }
    }

    if let Some(pending) = current.take() {
        transactions.push(pending.finish(config));
    }

    tracing::debug!(count = transactions.len(), "deutsche_bank extraction finished");
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "Buchung Valuta Vorgang Soll Haben";

    fn page(number: usize, lines: &[&str]) -> PageContent {
        PageContent {
            page_number: number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn config() -> EngineConfig {
        EngineConfig {
            base_year: Some(2024),
            ..Default::default()
        }
    }

    #[test]
    fn test_transaction_start_needs_date_and_amount() {
        assert!(is_transaction_start("02.01. 02.01. SEPA Lastschrift Stadtwerke -45,00"));
        assert!(is_transaction_start("03.01. 03.01. Gehalt + 2.500,00"));
        assert!(!is_transaction_start("02.01. 02.01. SEPA Lastschrift Stadtwerke"));
        assert!(!is_transaction_start("SEPA Lastschrift Stadtwerke -45,00"));
        assert!(!is_transaction_start(""));
    }

    #[test]
    fn test_parse_start_line() {
        let start = parse_start_line("02.01. 03.01. SEPA Lastschrift von Stadtwerke -1.045,00").unwrap();
        assert_eq!(start.booking, (2, 1));
        assert_eq!(start.value, (3, 1));
        assert_eq!(start.amount, dec!(-1045.00));
        assert_eq!(start.description, "SEPA Lastschrift von Stadtwerke");
    }

    #[test]
    fn test_parse_start_line_single_date() {
        let start = parse_start_line("15.03. Kartenzahlung +12,00").unwrap();
        assert_eq!(start.value, start.booking);
        assert_eq!(start.amount, dec!(12.00));
        assert_eq!(start.description, "Kartenzahlung");
    }

    #[test]
    fn test_parse_start_line_residual_date_stripped() {
        let start = parse_start_line("02.01. 02.01. 02.01 Gutschrift +5,00").unwrap();
        assert_eq!(start.description, "Gutschrift");
    }

    #[test]
    fn test_extract_infers_years_across_turn_of_year() {
        let pages = vec![page(
            1,
            &[
                "Kontoauszug",
                HEADER,
                "28.12. 28.12. Miete Dezember -800,00",
                "02.01. 02.01. Gehalt +2.500,00",
                "15.01. 15.01. Strom -45,00",
            ],
        )];
        let txs = extract(&pages, &config()).unwrap();
        let dates: Vec<&str> = txs.iter().map(|t| t.booking_date.as_str()).collect();
        assert_eq!(dates, vec!["28.12.2024", "02.01.2025", "15.01.2025"]);
    }

    #[test]
    fn test_value_date_takes_inferred_year() {
        let pages = vec![page(1, &[HEADER, "02.01. 31.12. Zinsgutschrift +1,00"])];
        let txs = extract(&pages, &config()).unwrap();
        assert_eq!(txs[0].booking_date, "02.01.2024");
        assert_eq!(txs[0].value_date, "31.12.2024");
    }

    #[test]
    fn test_impossible_date_leaves_year_untouched() {
        let pages = vec![page(
            1,
            &[
                HEADER,
                "15.03. 15.03. Miete -800,00",
                "31.02. 31.02. Kaputt -1,00",
                "20.03. 20.03. Strom -45,00",
            ],
        )];
        let txs = extract(&pages, &config()).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].booking_date, "20.03.2024");
    }

    #[test]
    fn test_explicit_year_on_following_line() {
        let pages = vec![page(
            1,
            &[HEADER, "05.03. 05.03. SEPA Überweisung an -20,00", "2023 2023", "Max Mustermann"],
        )];
        let txs = extract(&pages, &config()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].booking_date, "05.03.2023");
        assert_eq!(txs[0].description, "SEPA Überweisung an Max Mustermann");
    }

    #[test]
    fn test_continuation_filters() {
        let pages = vec![page(
            1,
            &[
                HEADER,
                "10.02. 10.02. SEPA Lastschrift -30,00",
                "Gläubiger-ID DE98ZZZ09999999999",
                "Mand-ID ABC-123",
                "2024 2024 Vodafone AG",
                "Rechnung 4711",
            ],
        )];
        let txs = extract(&pages, &config()).unwrap();
        assert_eq!(txs[0].description, "SEPA Lastschrift Vodafone AG Rechnung 4711");
    }

    #[test]
    fn test_description_truncated() {
        let cfg = EngineConfig {
            max_description_len: 10,
            ..config()
        };
        let pages = vec![page(1, &[HEADER, "10.02. 10.02. Sehr lange Beschreibung -1,00"])];
        let txs = extract(&pages, &cfg).unwrap();
        assert_eq!(txs[0].description, "Sehr lange");
    }

    #[test]
    fn test_unparseable_start_line_skipped() {
        let pages = vec![page(
            1,
            &[
                HEADER,
                "01.02. 01.02. Miete -800,00",
                "45.13. 45.13. Kaputt -1,00",
                "gehört zu nichts",
                "03.02. 03.02. Strom -45,00",
            ],
        )];
        let txs = extract(&pages, &config()).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].description, "Miete");
        assert_eq!(txs[1].description, "Strom");
    }

    #[test]
    fn test_continues_across_pages() {
        let pages = vec![
            page(
                1,
                &[
                    HEADER,
                    "01.02. 01.02. SEPA Überweisung -99,00",
                    "Verwendungszweck Teil eins",
                    "Seite 1 von 2",
                ],
            ),
            page(2, &["Kontoauszug", HEADER, "Teil zwei", "Neuer Saldo 1.000,00"]),
        ];
        let txs = extract(&pages, &config()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "SEPA Überweisung Verwendungszweck Teil eins Teil zwei");
    }

    #[test]
    fn test_terminal_footer_closes_transaction() {
        let pages = vec![page(
            1,
            &[
                HEADER,
                "01.02. 01.02. Miete -800,00",
                "Neuer Saldo 1.200,00",
                "Wichtige Hinweise zum Kontoauszug",
            ],
        )];
        let txs = extract(&pages, &config()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "Miete");
    }

    #[test]
    fn test_header_required() {
        let pages = vec![page(1, &["01.02. 01.02. Miete -800,00"])];
        let err = extract(&pages, &config()).unwrap_err();
        assert!(matches!(err, AuszugError::HeaderNotFound { .. }));
    }

    #[test]
    fn test_header_but_no_transactions_is_empty() {
        let pages = vec![page(1, &[HEADER, "Keine Umsätze"])];
        assert!(extract(&pages, &config()).unwrap().is_empty());
    }

    #[test]
    fn test_each_parse_has_fresh_year_state() {
        let pages = vec![page(1, &[HEADER, "28.12. 28.12. A -1,00", "02.01. 02.01. B -1,00"])];
        let first = extract(&pages, &config()).unwrap();
        let second = extract(&pages, &config()).unwrap();
        assert_eq!(first, second);
        assert_eq!(second[1].booking_date, "02.01.2025");
    }
}
