use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{CanonicalRecord, ListingId};
use crate::storage::table::{read_ids, read_records, write_records, WriteMode};

/// Data files in `dir` named `<prefix>*.csv`, sorted by path. A missing directory has no files.
pub fn discover_data_files(dir: &Path, prefix: &str, exclude: Option<&str>) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        debug!("Data directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };

        if name.starts_with(prefix) && name.ends_with(".csv") && Some(name) != exclude {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Identifiers already present in any of `paths`. Empty identifiers are ignored.
pub fn load_existing_ids(paths: &[PathBuf]) -> Result<HashSet<String>> {
    let mut existing = HashSet::new();

    for path in paths {
        let ids = read_ids(path)?;
        debug!("{}: {} identifiers", path.display(), ids.len());
        existing.extend(ids.into_iter().filter(|id| !id.is_empty()));
    }

    Ok(existing)
}

/// Candidates whose identifier is not in `existing`, in their original order
pub fn filter_new<T>(candidates: Vec<(ListingId, T)>, existing: &HashSet<String>) -> Vec<(ListingId, T)> {
    candidates
        .into_iter()
        .filter(|(id, _)| !existing.contains(id.as_str()))
        .collect()
}

/// Union of `sources` keeping the first row seen per identifier
pub fn merge_records<I>(sources: I) -> Vec<CanonicalRecord>
where
    I: IntoIterator<Item = Vec<CanonicalRecord>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for records in sources {
        for record in records {
            if seen.insert(record.hash_id.clone()) {
                merged.push(record);
            }
        }
    }

    merged
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Rows read per source file, in processing order
    pub per_file: Vec<(PathBuf, usize)>,
    pub unique: usize,
}

/// Collapse `paths` into `output`, first-seen row per identifier winning
pub fn merge_files(paths: &[PathBuf], output: &Path) -> Result<MergeReport> {
    let mut per_file = Vec::with_capacity(paths.len());
    let mut sources = Vec::with_capacity(paths.len());

    for path in paths {
        let records = read_records(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("{}: {} records", file_name, records.len());

        per_file.push((path.clone(), records.len()));
        sources.push(records);
    }

    let merged = merge_records(sources);
    write_records(output, &merged, WriteMode::Create)?;

    Ok(MergeReport {
        per_file,
        unique: merged.len(),
    })
}
