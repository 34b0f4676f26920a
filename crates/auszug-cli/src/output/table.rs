use auszug_core::formats::detect::DetectionReport;
use auszug_core::model::Statement;
use auszug_core::parsing::format_amount;
use rust_decimal::Decimal;

pub fn print_statement(statement: &Statement, separator: &str) {
    println!(
        "=== {} ({} transactions) ===\n",
        statement.format,
        statement.transactions.len()
    );

    if statement.transactions.is_empty() {
        return;
    }

    let amounts: Vec<String> = statement
        .transactions
        .iter()
        .map(|tx| format_amount(tx.amount))
        .collect();
    let amount_width = amounts.iter().map(|a| a.len()).max().unwrap_or(6);

    println!(
        "  {:<10}  {:<10}  {:>width$}  Description",
        "Booking",
        "Value",
        "Amount",
        width = amount_width
    );

    for (tx, amount) in statement.transactions.iter().zip(&amounts) {
        println!(
            "  {:<10}  {:<10}  {:>width$}  {}",
            tx.booking_date,
            tx.value_date,
            amount,
            tx.full_description(separator),
            width = amount_width
        );
        if let Some(ref kind) = tx.transaction_type {
            match tx.counterparty {
                Some(ref counterparty) => println!("      {kind} / {counterparty}"),
                None => println!("      {kind}"),
            }
        }
    }

    let (debits, credits): (Vec<_>, Vec<_>) =
        statement.transactions.iter().partition(|tx| tx.is_debit());
    let debit_total: Decimal = debits.iter().map(|tx| tx.amount).sum();
    let credit_total: Decimal = credits.iter().map(|tx| tx.amount).sum();
    println!(
        "\n  Debits: {}  Credits: {}  Net: {}",
        format_amount(debit_total),
        format_amount(credit_total),
        format_amount(debit_total + credit_total)
    );
}

pub fn print_detection(report: &DetectionReport) {
    println!("Format candidates:\n");
    for candidate in &report.candidates {
        match &candidate.result {
            Ok(txs) => println!("  {:<14} {} transaction(s)", candidate.format.as_str(), txs.len()),
            Err(e) => println!("  {:<14} 0 ({e})", candidate.format.as_str()),
        }
    }
    println!();
    match report.best() {
        Some(format) => println!("Detected: {format}"),
        None => println!("Detected: none (no format produced transactions)"),
    }
}
