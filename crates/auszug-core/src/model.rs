use crate::error::AuszugError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One booked movement on a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Posting date, rendered `DD.MM.YYYY` whenever the statement allows it.
    pub booking_date: String,
    /// Value date; equals `booking_date` when the statement omits it.
    pub value_date: String,
    /// Signed amount with two fractional digits. Negative is a debit.
    pub amount: Decimal,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remarks: Vec<String>,
}

impl Transaction {
    pub fn joined_remarks(&self, separator: &str) -> String {
        self.remarks.join(separator)
    }

    /// Description with the remarks folded in, as handed to exporters.
    pub fn full_description(&self, separator: &str) -> String {
        if self.remarks.is_empty() {
            self.description.clone()
        } else if self.description.is_empty() {
            self.joined_remarks(separator)
        } else {
            format!("{}{}{}", self.description, separator, self.joined_remarks(separator))
        }
    }

    pub fn is_debit(&self) -> bool {
        self.amount.is_sign_negative()
    }
}

/// Supported statement layouts, in auto-detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankFormat {
    /// Table-grid layout (date / description / amount columns).
    Sparkasse,
    /// Whitespace-tokenized layout with a value-date lookahead line.
    Ing,
    /// Free-text layout: date prefix and trailing signed amount.
    DeutscheBank,
}

impl BankFormat {
    pub const ALL: [BankFormat; 3] = [BankFormat::Sparkasse, BankFormat::Ing, BankFormat::DeutscheBank];

    pub fn as_str(&self) -> &'static str {
        match self {
            BankFormat::Sparkasse => "sparkasse",
            BankFormat::Ing => "ing",
            BankFormat::DeutscheBank => "deutsche_bank",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BankFormat::Sparkasse => "table grid: date, description and amount columns",
            BankFormat::Ing => "column text with booking line and value-date line",
            BankFormat::DeutscheBank => "free text: date prefix and trailing signed amount",
        }
    }
}

impl fmt::Display for BankFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing format choice: a pinned format or auto-detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatSelector {
    #[default]
    Auto,
    Fixed(BankFormat),
}

impl FromStr for FormatSelector {
    type Err = AuszugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(FormatSelector::Auto),
            "sparkasse" => Ok(FormatSelector::Fixed(BankFormat::Sparkasse)),
            "ing" => Ok(FormatSelector::Fixed(BankFormat::Ing)),
            "deutsche_bank" | "deutsche-bank" | "db" => {
                Ok(FormatSelector::Fixed(BankFormat::DeutscheBank))
            }
            _ => Err(AuszugError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}

impl fmt::Display for FormatSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSelector::Auto => f.write_str("auto"),
            FormatSelector::Fixed(format) => write!(f, "{format}"),
        }
    }
}

/// Extraction result: the format that produced it and the transactions in
/// document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub format: BankFormat,
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Transaction {
        Transaction {
            booking_date: "02.01.2025".into(),
            value_date: "02.01.2025".into(),
            amount: dec!(-12.50),
            description: "Kartenzahlung".into(),
            counterparty: None,
            transaction_type: None,
            remarks: vec!["REWE Markt".into(), "Berlin".into()],
        }
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("auto".parse::<FormatSelector>().unwrap(), FormatSelector::Auto);
        assert_eq!(
            " ING ".parse::<FormatSelector>().unwrap(),
            FormatSelector::Fixed(BankFormat::Ing)
        );
        assert_eq!(
            "db".parse::<FormatSelector>().unwrap(),
            FormatSelector::Fixed(BankFormat::DeutscheBank)
        );
    }

    #[test]
    fn test_unknown_selector() {
        let err = "commerzbank".parse::<FormatSelector>().unwrap_err();
        assert!(matches!(err, AuszugError::UnsupportedFormat(ref name) if name == "commerzbank"));
    }

    #[test]
    fn test_joined_remarks() {
        let tx = sample();
        assert_eq!(tx.joined_remarks(" | "), "REWE Markt | Berlin");
        assert_eq!(tx.full_description(" | "), "Kartenzahlung | REWE Markt | Berlin");
        assert!(tx.is_debit());
    }

    #[test]
    fn test_format_roundtrips_through_selector() {
        for format in BankFormat::ALL {
            let parsed: FormatSelector = format.as_str().parse().unwrap();
            assert_eq!(parsed, FormatSelector::Fixed(format));
        }
    }

    #[test]
    fn test_serialize_skips_empty_optionals() {
        let mut tx = sample();
        tx.remarks.clear();
        let json = serde_json::to_string(&tx).unwrap();
        assert!(!json.contains("counterparty"));
        assert!(!json.contains("remarks"));
        assert!(json.contains("\"amount\":\"-12.50\""));
    }
}
