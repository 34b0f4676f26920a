use crate::error::AuszugError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a German-locale amount string into a signed Decimal with two
/// fractional digits.
///
/// Handles formats like:
/// - "1.234,56" -> 1234.56 (`.` thousands, `,` decimal)
/// - "-7,00" -> -7.00
/// - "+ 12,50" -> 12.50 (sign token separated by whitespace)
/// - "45" -> 45.00
///
/// Anything else is `MalformedAmount`.
pub fn parse_amount(s: &str) -> Result<Decimal, AuszugError> {
    let raw = s.trim();
    let malformed = || AuszugError::MalformedAmount(raw.to_string());

    let (negative, digits) = if let Some(rest) = raw.strip_prefix('-') {
        (true, rest.trim_start())
    } else if let Some(rest) = raw.strip_prefix('+') {
        (false, rest.trim_start())
    } else {
        (false, raw)
    };

    if digits.is_empty()
        || !digits.starts_with(|c: char| c.is_ascii_digit())
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
        || digits.matches(',').count() > 1
    {
        return Err(malformed());
    }

    // Thousands separators go, the decimal comma becomes a dot
    let normalized = digits.replace('.', "").replace(',', ".");
    if normalized.ends_with('.') {
        return Err(malformed());
    }
    let mut value = Decimal::from_str(&normalized).map_err(|_| malformed())?;
    value.rescale(2);

    Ok(if negative { -value } else { value })
}

/// Render an amount the way statements print it ("1.234,56", "-7,00").
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    let plain = rounded.abs().to_string();
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{frac_part}")
}
