use crate::extraction::Table;
use crate::parsing::keywords::{contains_any, GRID_END};

/// Reconstruct a date / description / amount grid from `-layout` text.
///
/// pdftotext -layout preserves column alignment using spaces. The header
/// row fixes the column offsets; every following non-blank line becomes
/// one grid row, its whitespace-separated segments assigned to the column
/// they fall under.
///
/// Balance and page lines never become rows. Before the first booking row
/// they are skipped (opening balance); after it they end the grid.
pub fn reconstruct_table(layout_lines: &[String]) -> Option<Table> {
    let (header_idx, columns) = layout_lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| column_offsets(line).map(|c| (i, c)))?;

    let mut rows: Table = vec![split_row(&layout_lines[header_idx], &columns)];
    for line in &layout_lines[header_idx + 1..] {
        if line.trim().is_empty() {
            continue;
        }
        if contains_any(line, GRID_END) {
            if rows.len() > 1 {
                break;
            }
            continue;
        }
        rows.push(split_row(line, &columns));
    }

    if rows.len() < 2 {
        return None;
    }
    Some(rows)
}

const DATE_LABELS: &[&str] = &["buchungstag", "datum"];
const DESCRIPTION_LABELS: &[&str] = &[
    "erläuterung",
    "erlaeuterung",
    "verwendungszweck",
    "vorgang",
    "text",
];
const AMOUNT_LABELS: &[&str] = &["betrag"];

/// Character offsets of the description and amount columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnOffsets {
    description: usize,
    amount: usize,
}

/// Detect a table header row and return its column offsets.
///
/// A header names all three columns, in date / description / amount order.
fn column_offsets(line: &str) -> Option<ColumnOffsets> {
    let lower = line.to_lowercase();
    let date = find_label(&lower, DATE_LABELS)?;
    let description = find_label(&lower, DESCRIPTION_LABELS)?;
    let amount = find_label(&lower, AMOUNT_LABELS)?;

    if date < description && description < amount {
        Some(ColumnOffsets {
            description,
            amount,
        })
    } else {
        None
    }
}

/// Char offset of the first label found (labels are tried in order).
fn find_label(lower: &str, labels: &[&str]) -> Option<usize> {
    labels
        .iter()
        .find_map(|label| lower.find(label))
        .map(|byte_idx| lower[..byte_idx].chars().count())
}

fn split_row(line: &str, columns: &ColumnOffsets) -> Vec<String> {
    let mut date = Vec::new();
    let mut description = Vec::new();
    let mut amount = Vec::new();

    for segment in split_by_whitespace_gaps(line) {
        if segment.end > columns.amount {
            amount.push(segment.text);
        } else if segment.start + 1 >= columns.description {
            description.push(segment.text);
        } else {
            date.push(segment.text);
        }
    }

    vec![date.join(" "), description.join(" "), amount.join(" ")]
}

/// A run of text between gaps of 2+ whitespace characters.
/// `start`/`end` are char offsets within the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

/// Split a line by gaps of 2+ whitespace characters.
pub fn split_by_whitespace_gaps(line: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    // (byte index, char index) of the current segment start
    let mut start: Option<(usize, usize)> = None;
    // (byte index, char index) just past the last non-space char
    let mut last_end = (0, 0);
    let mut space_count = 0;

    for (char_idx, (byte_idx, c)) in line.char_indices().enumerate() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == 2 {
                if let Some((b, ch)) = start.take() {
                    segments.push(Segment {
                        start: ch,
                        end: last_end.1,
                        text: &line[b..last_end.0],
                    });
                }
            }
        } else {
            if start.is_none() {
                start = Some((byte_idx, char_idx));
            }
            space_count = 0;
            last_end = (byte_idx + c.len_utf8(), char_idx + 1);
        }
    }

    if let Some((b, ch)) = start {
        segments.push(Segment {
            start: ch,
            end: last_end.1,
            text: &line[b..last_end.0],
        });
    }

    segments
}
