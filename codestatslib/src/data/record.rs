//! Per-file records and line count arithmetic.

use std::ops::{Add, AddAssign};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Code, comment and blank line counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineCounts {
    /// Lines that are neither blank nor comments
    pub code: u64,
    /// Lines starting with a comment prefix, plus docstring lines
    pub comment: u64,
    /// Whitespace-only lines
    pub blank: u64,
}

impl LineCounts {
    /// Create counts with all zeros
    pub fn new() -> Self {
        Self::default()
    }

    /// Total lines
    pub fn total(&self) -> u64 {
        self.code + self.comment + self.blank
    }
}

impl Add for LineCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            code: self.code + other.code,
            comment: self.comment + other.comment,
            blank: self.blank + other.blank,
        }
    }
}

impl AddAssign for LineCounts {
    fn add_assign(&mut self, other: Self) {
        self.code += other.code;
        self.comment += other.comment;
        self.blank += other.blank;
    }
}

impl std::iter::Sum for LineCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), |acc, counts| acc + counts)
    }
}

/// One scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Extension including the leading `.`
    pub extension: String,
    /// Earlier of the file's creation and modification times
    pub created: DateTime<Utc>,
    /// Line counts for the file
    pub counts: LineCounts,
    /// Blank lines that legacy docstring accounting had to clamp away
    #[serde(default, skip_serializing_if = "is_zero")]
    pub clamped_blanks: u64,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl FileRecord {
    /// Create a record with no anomalies.
    pub fn new(
        path: impl Into<PathBuf>,
        extension: impl Into<String>,
        created: DateTime<Utc>,
        counts: LineCounts,
    ) -> Self {
        Self {
            path: path.into(),
            extension: extension.into(),
            created,
            counts,
            clamped_blanks: 0,
        }
    }

    /// The UTC year-month bucket of the record, e.g. `2024-03`.
    pub fn month(&self) -> String {
        self.created.format("%Y-%m").to_string()
    }

    /// Whether the counts were adjusted to avoid a negative blank count.
    pub fn has_anomaly(&self) -> bool {
        self.clamped_blanks > 0
    }
}
