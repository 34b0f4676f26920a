use regex::Regex;
use std::sync::LazyLock;

static CAMEL_JOIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zäöüß])([A-ZÄÖÜ])").unwrap());

/// Words that extraction glues together and the camel-case split does not
/// catch. Applied in order, after the split.
pub const STUCK_WORDS: &[(&str, &str)] = &[
    ("vonvon", "von von"),
    ("einzugvon", "einzug von"),
    ("überweisungvon", "überweisung von"),
    ("überweisungan", "überweisung an"),
    ("Einkaufbei", "Einkauf bei"),
    ("Ratefuer", "Rate für"),
    ("fuerMonat", "für Monat"),
    ("sagtDanke", "sagt Danke"),
    ("mangelsDeckung", "mangels Deckung"),
    ("oderwegen", "oder wegen"),
];

/// Repair word concatenation introduced by text extraction.
///
/// 1. Insert a space between a lowercase and a following uppercase letter
/// 2. Apply the `STUCK_WORDS` corrections
/// 3. Collapse runs of whitespace
///
/// Only ever inserts whitespace or swaps a known token, never drops text.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut s = CAMEL_JOIN_RE.replace_all(text, "$1 $2").into_owned();
    for (stuck, fixed) in STUCK_WORDS {
        if s.contains(stuck) {
            s = s.replace(stuck, fixed);
        }
    }

    collapse_whitespace(&s)
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters (never splits a char).
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}
