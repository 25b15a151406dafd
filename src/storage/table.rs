use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::models::{CanonicalRecord, CSV_COLUMNS};

// Spreadsheet applications need the marker to detect UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate and write the header
    Create,
    /// Append rows; the header is written only when the file does not exist yet
    Append,
}

/// Write one row per record under the fixed column header. Returns the number of rows written.
pub fn write_records(path: &Path, records: &[CanonicalRecord], mode: WriteMode) -> Result<usize> {
    let write_header = match mode {
        WriteMode::Create => true,
        WriteMode::Append => !path.exists(),
    };

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(mode == WriteMode::Append)
        .truncate(mode == WriteMode::Create)
        .open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;

    if write_header {
        file.write_all(UTF8_BOM)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if write_header {
        writer.write_record(CSV_COLUMNS)?;
    }
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write listing {} to {}", record.hash_id, path.display()))?;
    }
    writer.flush()?;

    Ok(records.len())
}

/// Read every row of a previously written file. Unknown columns are dropped and missing ones
/// read back empty.
pub fn read_records(path: &Path) -> Result<Vec<CanonicalRecord>> {
    read_rows(path)
}

/// Identifier column of a previously written file
pub fn read_ids(path: &Path) -> Result<Vec<String>> {
    #[derive(Deserialize)]
    struct IdRow {
        #[serde(default)]
        hash_id: String,
    }

    let rows: Vec<IdRow> = read_rows(path)?;
    Ok(rows.into_iter().map(|row| row.hash_id).collect())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content);

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| format!("Malformed row in {}", path.display()))
}
