//! JSON Lines loading for the annex CLI.
//!
//! Each non-blank line is one row: `{"vector": [..], "payload": {..}}`.
//! Unknown fields (such as an `id`) are ignored; rows are addressed by their
//! position in the file.

use annex_core::VectorTable;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// JSON Lines record structure
#[derive(Debug, Deserialize)]
struct JsonRecord {
    vector: Vec<f32>,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

/// Import statistics
#[derive(Debug, Default)]
pub struct ImportStats {
    pub total: usize,
    pub imported: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

impl ImportStats {
    /// Records per second
    #[allow(clippy::cast_precision_loss)]
    pub fn records_per_sec(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.imported as f64) / (self.duration_ms as f64 / 1000.0)
        }
    }
}

/// Loads a JSON Lines file into `table`.
pub fn import_jsonl(table: &VectorTable, path: &Path) -> Result<ImportStats> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open JSONL file {}", path.display()))?;
    let stats = import_reader(table, BufReader::with_capacity(128 * 1024, file))?;

    if stats.total == 0 {
        anyhow::bail!("Empty file: {}", path.display());
    }
    Ok(stats)
}

/// Loads JSON Lines from any buffered reader.
///
/// Malformed lines and rows the index rejects are counted as errors and
/// skipped. Corruption of the index aborts the load.
pub fn import_reader<R: BufRead>(table: &VectorTable, reader: R) -> Result<ImportStats> {
    let mut stats = ImportStats::default();
    let start = std::time::Instant::now();

    for (number, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        stats.total += 1;

        let record = match serde_json::from_str::<JsonRecord>(&line) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(line = number + 1, error = %err, "skipping malformed record");
                stats.errors += 1;
                continue;
            }
        };

        if let Some(dimension) = table.dimension() {
            if record.vector.len() != dimension {
                tracing::warn!(
                    line = number + 1,
                    expected = dimension,
                    actual = record.vector.len(),
                    "skipping record with wrong dimension"
                );
                stats.errors += 1;
                continue;
            }
        }

        match table.insert(&record.vector, record.payload) {
            Ok(_) => stats.imported += 1,
            Err(err) if err.is_recoverable() => {
                tracing::warn!(line = number + 1, error = %err, "skipping rejected record");
                stats.errors += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Index failure at line {}", number + 1))
            }
        }
    }

    stats.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(
        total = stats.total,
        imported = stats.imported,
        errors = stats.errors,
        duration_ms = stats.duration_ms,
        "import finished"
    );
    Ok(stats)
}

/// Parses a query vector given as a JSON array or comma-separated floats.
pub fn parse_vector(s: &str) -> Result<Vec<f32>> {
    let s = s.trim();
    if s.starts_with('[') {
        // JSON array format
        serde_json::from_str(s).context("Invalid JSON vector")
    } else {
        // Comma-separated format
        s.split(',')
            .map(|v| v.trim().parse::<f32>().context("Invalid float value"))
            .collect()
    }
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;
