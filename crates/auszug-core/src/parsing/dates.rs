use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// `DD.MM.` at the very start of a line.
pub static DATE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.").unwrap());

/// Every `DD.MM.` token in a line.
pub static SHORT_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{2}\.\d{2}\.").unwrap());

/// Rendering used for every emitted date.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Day and month of a `DD.MM.` / `DD.MM` token.
pub fn day_month(token: &str) -> Option<(u32, u32)> {
    let mut parts = token.trim_end_matches('.').split('.');
    let day = parts.next().filter(|p| p.len() == 2)?.parse().ok()?;
    let month = parts.next().filter(|p| p.len() == 2)?.parse().ok()?;
    Some((day, month))
}

/// Parse `DD.MM.YYYY`, `DD.MM.YY`, `DD.MM.` or `DD.MM` into a calendar date.
/// Tokens without a year take `fallback_year`.
pub fn parse_date(token: &str, fallback_year: Option<i32>) -> Option<NaiveDate> {
    let token = token.trim();
    let parts: Vec<&str> = token.split('.').collect();
    let (day, month, year) = match parts.as_slice() {
        [d, m] | [d, m, ""] => (*d, *m, None),
        [d, m, y] => (*d, *m, Some(*y)),
        _ => return None,
    };

    if day.len() != 2 || month.len() != 2 {
        return None;
    }
    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;

    let year = match year {
        Some(y) if y.len() == 4 && y.chars().all(|c| c.is_ascii_digit()) => y.parse().ok()?,
        Some(y) if y.len() == 2 && y.chars().all(|c| c.is_ascii_digit()) => {
            2000 + y.parse::<i32>().ok()?
        }
        Some(_) => return None,
        None => fallback_year?,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn render_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Normalize a date token to `DD.MM.YYYY`, or None if it is not a date.
pub fn normalize_date(token: &str, fallback_year: Option<i32>) -> Option<String> {
    parse_date(token, fallback_year).map(render_date)
}

/// First `DD.MM` or `DD.MM.YYYY` token in free text (surrounding
/// punctuation stripped).
pub fn find_date_token(text: &str) -> Option<&str> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| matches!(c, '(' | ')' | ',' | ';' | ':')))
        .find(|token| {
            let parts: Vec<&str> = token.split('.').collect();
            match parts.as_slice() {
                [d, m] => is_digits(d) && is_digits(m) && d.len() == 2,
                [d, m, _] => is_digits(d) && is_digits(m),
                _ => false,
            }
        })
}

/// A `DD.MM.YYYY`-shaped leading token: two dots, the first at offset 2,
/// at least eight characters long.
pub fn is_booking_date_token(token: &str) -> bool {
    token.matches('.').count() == 2 && token.len() >= 8 && token.as_bytes().get(2) == Some(&b'.')
}

/// Rolling year state for one document parse.
///
/// An explicit year seeds or overrides the current year; otherwise a month
/// smaller than the previous one advances the year by one.
#[derive(Debug, Clone)]
pub struct YearTracker {
    year: i32,
    last_month: Option<u32>,
}

impl YearTracker {
    pub fn new(seed_year: i32) -> Self {
        YearTracker {
            year: seed_year,
            last_month: None,
        }
    }

    /// The year `resolve` would return, without moving the state.
    pub fn peek(&self, month: u32, explicit_year: Option<i32>) -> i32 {
        match explicit_year {
            Some(year) => year,
            None if self.last_month.is_some_and(|last| month < last) => self.year + 1,
            None => self.year,
        }
    }

    pub fn resolve(&mut self, month: u32, explicit_year: Option<i32>) -> i32 {
        self.year = self.peek(month, explicit_year);
        self.last_month = Some(month);
        self.year
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_date() {
        let d = parse_date("28.12.2024", None).unwrap();
        assert_eq!(render_date(d), "28.12.2024");
    }

    #[test]
    fn test_parse_short_date_needs_year() {
        assert!(parse_date("28.12.", None).is_none());
        assert_eq!(normalize_date("28.12.", Some(2024)).as_deref(), Some("28.12.2024"));
        assert_eq!(normalize_date("02.01", Some(2025)).as_deref(), Some("02.01.2025"));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(normalize_date("05.03.25", None).as_deref(), Some("05.03.2025"));
    }

    #[test]
    fn test_invalid_calendar_date() {
        assert!(parse_date("31.02.2025", None).is_none());
        assert!(parse_date("1.2.2025", None).is_none());
        assert!(parse_date("Datum", None).is_none());
    }

    #[test]
    fn test_day_month() {
        assert_eq!(day_month("28.12."), Some((28, 12)));
        assert_eq!(day_month("02.01"), Some((2, 1)));
        assert_eq!(day_month("x"), None);
    }

    #[test]
    fn test_date_regexes() {
        assert!(DATE_PREFIX_RE.is_match("02.01. 02.01. Miete"));
        assert!(!DATE_PREFIX_RE.is_match("Miete 02.01."));
        let found: Vec<&str> = SHORT_DATE_RE
            .find_iter("02.01. 03.01. SEPA")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["02.01.", "03.01."]);
    }

    #[test]
    fn test_find_date_token() {
        assert_eq!(find_date_token("05.01.2025 Mandat 123"), Some("05.01.2025"));
        assert_eq!(find_date_token("Valuta (05.01)"), Some("05.01"));
        assert_eq!(find_date_token("Referenz 12345"), None);
        assert_eq!(find_date_token("Betrag 1.234"), None);
    }

    #[test]
    fn test_year_rollover_once() {
        let mut years = YearTracker::new(2024);
        assert_eq!(years.resolve(12, None), 2024);
        assert_eq!(years.resolve(1, None), 2025);
        assert_eq!(years.resolve(1, None), 2025);
        assert_eq!(years.resolve(2, None), 2025);
    }

    #[test]
    fn test_explicit_year_overrides() {
        let mut years = YearTracker::new(2030);
        assert_eq!(years.resolve(5, Some(2023)), 2023);
        assert_eq!(years.resolve(6, None), 2023);
        assert_eq!(years.resolve(1, None), 2024);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut years = YearTracker::new(2024);
        years.resolve(12, None);
        assert_eq!(years.peek(1, None), 2025);
        assert_eq!(years.peek(1, None), 2025);
        assert_eq!(years.resolve(12, None), 2024);
    }

    #[test]
    fn test_is_booking_date_token() {
        assert!(is_booking_date_token("02.01.2025"));
        assert!(!is_booking_date_token("02.01."));
        assert!(!is_booking_date_token("2025.01.02"));
        assert!(!is_booking_date_token("Lastschrift"));
    }
}
