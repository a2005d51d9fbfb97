use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;
use tracing::debug;

/// A rectangular string table: one header row plus data rows, every row
/// padded to the header width. All cells are kept as strings; the engine
/// never interprets a cell until a specific rule asks for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Position of the first column with this exact name. Duplicate names
    /// resolve to the leftmost occurrence.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read a delimited file into raw rows, no header interpretation.
/// `flexible` keeps ragged rows (human-maintained sheets routinely have
/// them); the header promoter squares the table off afterwards.
pub fn read_raw<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .with_context(|| format!("CSV parse error in {} at record {}", path.display(), idx))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    debug!(rows = rows.len(), path = %path.display(), "read raw table");
    Ok(rows)
}

/// Serialize a table back to disk with standard CSV quoting.
pub fn write<P: AsRef<Path>>(path: P, table: &Table) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    wtr.write_record(&table.headers)
        .with_context(|| format!("failed to write header to {}", path.display()))?;
    for row in &table.rows {
        wtr.write_record(row)
            .with_context(|| format!("failed to write row to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}
