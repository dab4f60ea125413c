use std::{fs::File, io, path::Path};

use anyhow::{Context, Result};
use tracing::warn;

use crate::monitoring::validation::RawTarget;

/// Read `url,interval[,pattern]` rows from a CSV file.
///
/// The file has no header row. Lines starting with `#` are comments. URL and
/// interval are trimmed; the pattern is kept exactly as written.
/// Rows with the wrong number of fields are logged and skipped; an
/// unreadable file is an error.
pub fn read_targets(path: &Path) -> Result<Vec<RawTarget>> {
    let file = File::open(path)
        .with_context(|| format!("Error: URLs file \"{}\" not found", path.display()))?;
    parse_targets(file).with_context(|| format!("Error reading CSV file \"{}\"", path.display()))
}

pub fn parse_targets(reader: impl io::Read) -> Result<Vec<RawTarget>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        match (record.get(0), record.get(1), record.get(2), record.len()) {
            (Some(url), Some(interval), pattern, 2 | 3) => {
                rows.push(RawTarget::new(url.trim(), interval.trim(), pattern));
            }
            _ => {
                let fields: Vec<&str> = record.iter().collect();
                warn!(
                    "Skipping line {}: expected url,interval[,pattern] but got {} field(s): {}",
                    line,
                    record.len(),
                    fields.join(", ")
                );
            }
        }
    }

    Ok(rows)
}
