use crate::error::AuszugError;
use crate::model::Transaction;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct CsvRecord<'a> {
    booking_date: &'a str,
    value_date: &'a str,
    amount: String,
    transaction_type: &'a str,
    counterparty: &'a str,
    description: &'a str,
    remarks: String,
}

/// Write transactions as CSV with a header row.
///
/// Amounts use a plain decimal point; remarks are joined with `separator`.
pub fn write_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
    separator: &str,
) -> Result<(), AuszugError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for tx in transactions {
        wtr.serialize(CsvRecord {
            booking_date: &tx.booking_date,
            value_date: &tx.value_date,
            amount: tx.amount.to_string(),
            transaction_type: tx.transaction_type.as_deref().unwrap_or(""),
            counterparty: tx.counterparty.as_deref().unwrap_or(""),
            description: &tx.description,
            remarks: tx.joined_remarks(separator),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
