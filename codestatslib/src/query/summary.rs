//! The three summaries derived from file records.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::data::record::{FileRecord, LineCounts};

/// Summed line counts for one extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionTotals {
    /// Extension including the leading `.`
    pub extension: String,
    /// Summed counts over all files with this extension
    pub counts: LineCounts,
    /// `counts.total()`, kept for sorting and proportional sizing
    pub total: u64,
}

/// Line totals per extension, sorted by combined total, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionSummary {
    /// One row per extension
    pub rows: Vec<ExtensionTotals>,
    /// Counts summed over every extension
    pub total: LineCounts,
}

impl ExtensionSummary {
    /// Group records by extension and sum their counts.
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut groups: HashMap<&str, LineCounts> = HashMap::new();
        for record in records {
            *groups.entry(record.extension.as_str()).or_default() += record.counts;
        }

        let mut rows: Vec<ExtensionTotals> = groups
            .into_iter()
            .map(|(extension, counts)| ExtensionTotals {
                extension: extension.to_string(),
                counts,
                total: counts.total(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.extension.cmp(&b.extension))
        });

        let total = rows.iter().map(|r| r.counts).sum();

        Self { rows, total }
    }

    /// Fraction of all lines that belong to `row`, in `0.0..=1.0`.
    pub fn share(&self, row: &ExtensionTotals) -> f64 {
        let grand = self.total.total();
        if grand == 0 {
            0.0
        } else {
            row.total as f64 / grand as f64
        }
    }

    /// Totals for one extension.
    pub fn get(&self, extension: &str) -> Option<&ExtensionTotals> {
        self.rows.iter().find(|r| r.extension == extension)
    }
}

/// One month of the pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRow {
    /// `YYYY-MM` bucket
    pub month: String,
    /// Counts per extension; extensions with no files that month are absent
    pub cells: BTreeMap<String, LineCounts>,
}

impl MonthRow {
    /// Counts for an extension in this month, if it had any files.
    pub fn get(&self, extension: &str) -> Option<&LineCounts> {
        self.cells.get(extension)
    }

    /// All lines in this month.
    pub fn total(&self) -> u64 {
        self.cells.values().map(LineCounts::total).sum()
    }
}

/// Line counts by month (rows, ascending) and extension (columns, ascending).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPivot {
    /// Column keys: every extension present in the records
    pub extensions: Vec<String>,
    /// Row per month that has at least one file
    pub rows: Vec<MonthRow>,
}

impl MonthlyPivot {
    /// Bucket records by UTC month, group by (month, extension) and pivot.
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut months: BTreeMap<String, BTreeMap<String, LineCounts>> = BTreeMap::new();
        let mut extensions = BTreeSet::new();

        for record in records {
            extensions.insert(record.extension.clone());
            *months
                .entry(record.month())
                .or_default()
                .entry(record.extension.clone())
                .or_default() += record.counts;
        }

        Self {
            extensions: extensions.into_iter().collect(),
            rows: months
                .into_iter()
                .map(|(month, cells)| MonthRow { month, cells })
                .collect(),
        }
    }

    /// Counts for a (month, extension) cell, `None` when no file falls in it.
    pub fn get(&self, month: &str, extension: &str) -> Option<&LineCounts> {
        self.rows
            .iter()
            .find(|r| r.month == month)
            .and_then(|r| r.get(extension))
    }

    /// Month keys in ascending order.
    pub fn months(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.month.as_str())
    }
}

/// Number of files with one extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionFileCount {
    /// Extension including the leading `.`
    pub extension: String,
    /// Files with this extension
    pub files: u64,
}

/// File counts per extension, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCountSummary {
    /// One row per extension
    pub rows: Vec<ExtensionFileCount>,
    /// Total files
    pub total: u64,
}

impl FileCountSummary {
    /// Count records per extension.
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut groups: HashMap<&str, u64> = HashMap::new();
        for record in records {
            *groups.entry(record.extension.as_str()).or_default() += 1;
        }

        let mut rows: Vec<ExtensionFileCount> = groups
            .into_iter()
            .map(|(extension, files)| ExtensionFileCount {
                extension: extension.to_string(),
                files,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.files
                .cmp(&a.files)
                .then_with(|| a.extension.cmp(&b.extension))
        });

        Self {
            rows,
            total: records.len() as u64,
        }
    }
}

/// All three summaries of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summaries {
    /// Line totals per extension
    pub by_extension: ExtensionSummary,
    /// Month × extension pivot
    pub by_month: MonthlyPivot,
    /// File counts per extension
    pub file_counts: FileCountSummary,
}

/// Build every summary from `records`.
pub fn aggregate(records: &[FileRecord]) -> Summaries {
    Summaries {
        by_extension: ExtensionSummary::from_records(records),
        by_month: MonthlyPivot::from_records(records),
        file_counts: FileCountSummary::from_records(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(ext: &str, month: u32, code: u64, comment: u64, blank: u64) -> FileRecord {
        FileRecord::new(
            format!("/repo/file{}{}", code, ext),
            ext,
            Utc.with_ymd_and_hms(2024, month, 15, 12, 0, 0).unwrap(),
            LineCounts {
                code,
                comment,
                blank,
            },
        )
    }

    #[test]
    fn test_by_extension_sums_and_sorts() {
        let records = vec![
            record(".py", 1, 10, 2, 1),
            record(".py", 1, 5, 0, 0),
            record(".go", 1, 7, 1, 1),
        ];

        let summary = ExtensionSummary::from_records(&records);

        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].extension, ".py");
        assert_eq!(
            summary.rows[0].counts,
            LineCounts {
                code: 15,
                comment: 2,
                blank: 1
            }
        );
        assert_eq!(summary.rows[0].total, 18);
        assert_eq!(summary.rows[1].extension, ".go");
        assert_eq!(
            summary.rows[1].counts,
            LineCounts {
                code: 7,
                comment: 1,
                blank: 1
            }
        );
        assert_eq!(summary.rows[1].total, 9);
        assert_eq!(summary.total.total(), 27);
    }

    #[test]
    fn test_by_extension_ties_break_on_name() {
        let records = vec![record(".js", 1, 3, 0, 0), record(".c", 1, 3, 0, 0)];

        let summary = ExtensionSummary::from_records(&records);

        assert_eq!(summary.rows[0].extension, ".c");
        assert_eq!(summary.rows[1].extension, ".js");
    }

    #[test]
    fn test_share() {
        let records = vec![record(".py", 1, 3, 0, 0), record(".sh", 1, 1, 0, 0)];

        let summary = ExtensionSummary::from_records(&records);
        let py = summary.get(".py").unwrap();

        assert!((summary.share(py) - 0.75).abs() < f64::EPSILON);
        assert_eq!(ExtensionSummary::default().total.total(), 0);
    }

    #[test]
    fn test_share_of_empty_files_is_zero() {
        let records = vec![record(".py", 1, 0, 0, 0)];

        let summary = ExtensionSummary::from_records(&records);

        assert_eq!(summary.share(&summary.rows[0]), 0.0);
    }

    #[test]
    fn test_monthly_pivot() {
        let records = vec![
            record(".py", 3, 10, 0, 0),
            record(".py", 1, 4, 1, 0),
            record(".py", 1, 2, 0, 1),
            record(".js", 3, 6, 0, 0),
        ];

        let pivot = MonthlyPivot::from_records(&records);

        assert_eq!(pivot.extensions, vec![".js", ".py"]);
        assert_eq!(pivot.months().collect::<Vec<_>>(), vec!["2024-01", "2024-03"]);
        assert_eq!(pivot.get("2024-01", ".py").unwrap().total(), 8);
        assert_eq!(pivot.get("2024-03", ".py").unwrap().total(), 10);
        assert_eq!(pivot.get("2024-03", ".js").unwrap().code, 6);
        assert_eq!(pivot.rows[1].total(), 16);
    }

    #[test]
    fn test_monthly_pivot_missing_cells_are_absent() {
        let records = vec![record(".py", 1, 1, 0, 0), record(".js", 2, 1, 0, 0)];

        let pivot = MonthlyPivot::from_records(&records);

        assert!(pivot.get("2024-01", ".js").is_none());
        assert!(pivot.get("2024-02", ".py").is_none());
        assert!(pivot.get("2024-05", ".py").is_none());
        assert_eq!(pivot.rows[0].cells.len(), 1);
    }

    #[test]
    fn test_monthly_pivot_buckets_in_utc() {
        let late = FileRecord::new(
            "/repo/late.py",
            ".py",
            Utc.with_ymd_and_hms(2024, 1, 31, 23, 30, 0).unwrap(),
            LineCounts {
                code: 1,
                comment: 0,
                blank: 0,
            },
        );

        let pivot = MonthlyPivot::from_records(&[late]);

        assert_eq!(pivot.rows[0].month, "2024-01");
    }

    #[test]
    fn test_file_counts() {
        let records = vec![
            record(".py", 1, 100, 0, 0),
            record(".js", 1, 1, 0, 0),
            record(".js", 2, 2, 0, 0),
            record(".js", 3, 3, 0, 0),
        ];

        let counts = FileCountSummary::from_records(&records);

        assert_eq!(counts.total, 4);
        assert_eq!(counts.rows[0].extension, ".js");
        assert_eq!(counts.rows[0].files, 3);
        assert_eq!(counts.rows[1].extension, ".py");
        assert_eq!(counts.rows[1].files, 1);
    }

    #[test]
    fn test_aggregate_empty() {
        let summaries = aggregate(&[]);

        assert!(summaries.by_extension.rows.is_empty());
        assert!(summaries.by_month.rows.is_empty());
        assert!(summaries.file_counts.rows.is_empty());
        assert_eq!(summaries.file_counts.total, 0);
    }

    #[test]
    fn test_aggregate_is_rebuilt_from_records() {
        let mut records = vec![record(".py", 1, 1, 0, 0)];
        let before = aggregate(&records);

        records.push(record(".py", 1, 2, 0, 0));
        let after = aggregate(&records);

        assert_eq!(before.by_extension.rows[0].total, 1);
        assert_eq!(after.by_extension.rows[0].total, 3);
        assert_eq!(after.file_counts.total, 2);
    }
}
