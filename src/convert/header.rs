use crate::table::Table;
use tracing::debug;

/// How far down a sheet the header row is allowed to hide. Preamble beyond
/// this is treated as data belonging to row 0's header.
pub const LOOKAHEAD: usize = 8;

/// Index of the row most likely to be the real header: the first row within
/// the look-ahead window containing a cell whose trimmed, lower-cased value
/// equals or contains "title". Defaults to 0, so this never fails; at worst
/// the caller promotes a semantically wrong row.
pub fn detect_header_row(raw: &[Vec<String>], lookahead: usize) -> usize {
    for (i, row) in raw.iter().take(lookahead).enumerate() {
        if row.iter().any(|cell| cell.trim().to_lowercase().contains("title")) {
            return i;
        }
    }
    0
}

/// Re-base the raw table beneath its detected header row. Header names are
/// trimmed, empty ones become `unnamed_<i>`, and every data row is padded or
/// truncated to the header width.
pub fn promote(raw: &[Vec<String>], lookahead: usize) -> Table {
    let header_idx = detect_header_row(raw, lookahead);
    debug!(header_idx, "promoting header row");

    let headers: Vec<String> = raw
        .get(header_idx)
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, h)| {
                    let name = h.trim();
                    if name.is_empty() {
                        format!("unnamed_{}", i)
                    } else {
                        name.to_string()
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let width = headers.len();
    let rows = raw
        .iter()
        .skip(header_idx + 1)
        .map(|row| {
            let mut row = row.clone();
            row.resize(width, String::new());
            row
        })
        .collect();

    Table { headers, rows }
}
