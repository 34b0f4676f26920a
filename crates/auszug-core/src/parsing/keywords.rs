//! Keyword tables driving the line classifiers.
//!
//! Tables hold lowercase entries unless noted; matching is a substring
//! test against the whole line.

/// Deutsche Bank: lines that end the transaction area of the current page.
pub const DB_PAGE_FOOTER: &[&str] = &[
    "auszug",
    "seite",
    "iban de",
    "alter saldo",
    "filialnummer",
    "kontonummer",
    "bic (swift)",
];

/// Deutsche Bank: lines after which no more transactions follow.
pub const DB_TERMINAL_FOOTER: &[&str] = &["neuer saldo", "wichtige hinweise", "bitte erheben"];

/// Deutsche Bank: technical continuation lines (case-sensitive).
pub const DB_TECHNICAL: &[&str] = &[
    "Gläubiger-ID",
    "Mand-ID",
    "RCUR",
    "OTHR",
    "SALA",
    "RINP",
    "Wiederholungslastschrift",
    "Dauerauftrag",
    "BIC ",
    "IBAN",
    "Folgenr.",
    "Verfalld.",
    "Kartennr.",
];

/// Deutsche Bank: words that together mark the column header row
/// (case-sensitive, all must be present).
pub const DB_TABLE_HEADER: &[&str] = &["Buchung", "Valuta", "Vorgang"];

/// Table grid: balance, carry-over and page lines below the booking rows.
pub const GRID_END: &[&str] = &["kontostand", "saldo", "übertrag", "summe", "seite "];

/// ING: known transaction type labels.
pub const ING_TRANSACTION_TYPES: &[&str] = &[
    "lastschrift",
    "ueberweisung",
    "überweisung",
    "gutschrift",
    "visa",
    "dauerauftrag",
    "kartenzahlung",
    "abbuchung",
    "zahlung",
    "sepa",
];

/// ING: header and footer lines inside the table region.
pub const ING_SKIP: &[&str] = &[
    "saldo",
    "zins",
    "abschluss",
    "einlagensicherung",
    "kontoübersicht",
    "kunden-information",
    "datum",
    "auszugsnummer",
    "eingeraumte kontoüberziehung",
    "eingeräumte kontoüberziehung",
    "ing-diba",
    "theodor-heuss",
    "girokonto nummer",
    "girokonto",
    "iban",
    "bic",
    "buchung / verwendungszweck",
    "betrag (eur)",
    "valuta",
    "seite ",
    "kontoauszug",
    "blz",
    "summe belastungen",
    "summe gutschriften",
    "saldo vorgetragen",
    "neuer saldo",
    "alter saldo",
    "kontostand",
];

/// ING: skip lines recognised by their start only.
pub const ING_SKIP_PREFIXES: &[&str] = &["ing "];

/// ING: column header lines opening the table region.
pub const ING_TABLE_START: &[&str] = &["buchung / verwendungszweck", "betrag (eur)"];

/// ING: summary lines closing the table region.
pub const ING_TABLE_END: &[&str] = &[
    "summe belastungen",
    "summe gutschriften",
    "saldo vorgetragen",
    "neuer saldo",
    "alter saldo",
    "kontostand",
];

/// ING: explanatory text that marks a summary row rather than a booking.
pub const ING_EXCLUDE: &[&str] = &["saldo", "zins", "abschluss"];

/// Case-insensitive substring match of any keyword against the whole line.
/// Keywords must be lowercase.
pub fn contains_any(line: &str, keywords: &[&str]) -> bool {
    let lower = line.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

/// Case-sensitive substring match.
pub fn contains_any_exact(line: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| line.contains(kw))
}

pub fn starts_with_any(line: &str, prefixes: &[&str]) -> bool {
    let lower = line.to_lowercase();
    prefixes.iter().any(|p| lower.starts_with(p))
}
