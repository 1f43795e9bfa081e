//! High-level scanning API.
//!
//! Joins the stages: walk the configured roots, read each file, classify its
//! lines, and stamp it with its earliest timestamp.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CodestatsError;
use crate::query::summary::{aggregate, Summaries};
use crate::source::config::ScanConfig;
use crate::source::walker::{extension_of, walk_roots};
use crate::Result;

use super::classifier::{classify, Classification};
use super::record::{FileRecord, LineCounts};

/// Result of scanning every configured root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Roots that were walked
    pub roots: Vec<PathBuf>,
    /// One record per counted file, in path order
    pub records: Vec<FileRecord>,
}

impl ScanResult {
    /// Line counts summed over all records.
    pub fn total(&self) -> LineCounts {
        self.records.iter().map(|r| r.counts).sum()
    }

    /// Number of files counted.
    pub fn file_count(&self) -> usize {
        self.records.len()
    }

    /// Records whose counts were clamped by legacy docstring accounting.
    pub fn anomalies(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| r.has_anomaly())
    }

    /// Build the three summaries from the records.
    pub fn summarize(&self) -> Summaries {
        aggregate(&self.records)
    }
}

/// Scan every root in `config` and record each valid file.
///
/// # Example
///
/// ```rust
/// use codestatslib::{scan, ScanConfig};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// fs::write(dir.path().join("run.sh"), "#!/bin/sh\n\necho hi\n").unwrap();
/// fs::write(dir.path().join("Makefile"), "all:\n").unwrap();
///
/// let result = scan(&ScanConfig::new().root(dir.path())).unwrap();
/// assert_eq!(result.file_count(), 1);
/// assert_eq!(result.total().total(), 3);
/// ```
pub fn scan(config: &ScanConfig) -> Result<ScanResult> {
    let files = walk_roots(config)?;

    let mut result = ScanResult {
        roots: config.roots.clone(),
        records: Vec::with_capacity(files.len()),
    };

    for path in files {
        result.records.push(scan_file(&path, config)?);
    }

    debug!(files = result.records.len(), "scan complete");

    Ok(result)
}

/// Build the record for a single file.
///
/// Files without an extension are recorded with an empty extension; the
/// walker never emits those.
pub fn scan_file(path: impl AsRef<Path>, config: &ScanConfig) -> Result<FileRecord> {
    let path = path.as_ref();
    let extension = extension_of(path).unwrap_or_default();

    let classification = count_file(path, &extension, config)?;
    let created = earliest_timestamp(path)?;

    debug!(
        path = %path.display(),
        code = classification.counts.code,
        comment = classification.counts.comment,
        blank = classification.counts.blank,
        "counted"
    );

    if classification.clamped_blanks > 0 {
        warn!(
            path = %path.display(),
            docstrings = classification.docstrings,
            clamped = classification.clamped_blanks,
            "blank line count went negative after docstring removal; clamped to zero"
        );
    }

    Ok(FileRecord {
        path: path.to_path_buf(),
        extension,
        created,
        counts: classification.counts,
        clamped_blanks: classification.clamped_blanks,
    })
}

/// Read and classify one file.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the scan.
pub fn count_file(
    path: impl AsRef<Path>,
    extension: &str,
    config: &ScanConfig,
) -> Result<Classification> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| CodestatsError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = String::from_utf8_lossy(&bytes);

    Ok(classify(&text, extension, config))
}

/// The earlier of a file's creation and modification times.
///
/// Creation time is not available on every platform or filesystem; the
/// modification time alone is used then.
fn earliest_timestamp(path: &Path) -> Result<DateTime<Utc>> {
    let metadata_err = |e| CodestatsError::Metadata {
        path: path.to_path_buf(),
        source: e,
    };

    let metadata = fs::metadata(path).map_err(metadata_err)?;
    let modified = metadata.modified().map_err(metadata_err)?;
    let earliest: SystemTime = match metadata.created() {
        Ok(created) => created.min(modified),
        Err(_) => modified,
    };

    Ok(DateTime::<Utc>::from(earliest))
}
