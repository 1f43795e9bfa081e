//! Table-ready data structures for summary output.
//!
//! The data flow is:
//! 1. Records (`ScanResult`)
//! 2. Summaries (grouped, summed, sorted)
//! 3. SummaryTable (formatted strings for display)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::record::{FileRecord, LineCounts};
use crate::query::summary::{ExtensionSummary, FileCountSummary, MonthlyPivot, Summaries};

/// Marker for a pivot cell with no files.
pub const ABSENT_CELL: &str = "-";

/// A single row in a table (data row or footer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label (extension, month, file path, "Total", etc.)
    pub label: String,
    /// Values for each column after the label, ready for display
    pub values: Vec<String>,
}

/// Table-ready summary data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Title shown above the table
    pub title: String,
    /// Column headers: [label_header, value1, value2, ...]
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<TableRow>,
    /// Summary/footer row
    pub footer: TableRow,
}

fn format_counts(counts: &LineCounts) -> Vec<String> {
    vec![
        counts.code.to_string(),
        counts.comment.to_string(),
        counts.blank.to_string(),
        counts.total().to_string(),
    ]
}

fn format_share(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

fn share(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

/// Compute a relative path label for a file.
/// Returns the path relative to `base`, falling back to the full path if strip fails.
fn relative_path_label(path: &Path, base: Option<&Path>) -> String {
    base.and_then(|b| path.strip_prefix(b).ok())
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

impl SummaryTable {
    /// Line totals per extension with each extension's share of all lines.
    pub fn from_extension_summary(summary: &ExtensionSummary) -> Self {
        let headers = ["Extension", "Code", "Comments", "Blanks", "Total", "Share"]
            .iter()
            .map(|h| h.to_string())
            .collect();

        let rows = summary
            .rows
            .iter()
            .map(|row| {
                let mut values = format_counts(&row.counts);
                values.push(format_share(summary.share(row)));
                TableRow {
                    label: row.extension.clone(),
                    values,
                }
            })
            .collect();

        let mut values = format_counts(&summary.total);
        values.push(format_share(if summary.total.total() > 0 { 1.0 } else { 0.0 }));
        let footer = TableRow {
            label: format!(
                "Total ({})",
                plural(summary.rows.len(), "extension", "extensions")
            ),
            values,
        };

        SummaryTable {
            title: "Total Line Counts by File Type".to_string(),
            headers,
            rows,
            footer,
        }
    }

    /// Month × extension pivot of total lines. Empty cells show [`ABSENT_CELL`].
    pub fn from_monthly_pivot(pivot: &MonthlyPivot) -> Self {
        let mut headers = vec!["Month".to_string()];
        headers.extend(pivot.extensions.iter().cloned());
        headers.push("Total".to_string());

        let mut column_totals = vec![0u64; pivot.extensions.len()];
        let rows = pivot
            .rows
            .iter()
            .map(|row| {
                let mut values: Vec<String> = pivot
                    .extensions
                    .iter()
                    .enumerate()
                    .map(|(i, ext)| match row.get(ext) {
                        Some(counts) => {
                            column_totals[i] += counts.total();
                            counts.total().to_string()
                        }
                        None => ABSENT_CELL.to_string(),
                    })
                    .collect();
                values.push(row.total().to_string());
                TableRow {
                    label: row.month.clone(),
                    values,
                }
            })
            .collect();

        let grand: u64 = column_totals.iter().sum();
        let mut values: Vec<String> = column_totals.iter().map(|t| t.to_string()).collect();
        values.push(grand.to_string());
        let footer = TableRow {
            label: format!("Total ({})", plural(pivot.rows.len(), "month", "months")),
            values,
        };

        SummaryTable {
            title: "Line Count Distribution by Month and File Type".to_string(),
            headers,
            rows,
            footer,
        }
    }

    /// File counts per extension with each extension's share of all files.
    pub fn from_file_counts(summary: &FileCountSummary) -> Self {
        let headers = ["Extension", "Files", "Share"]
            .iter()
            .map(|h| h.to_string())
            .collect();

        let rows = summary
            .rows
            .iter()
            .map(|row| TableRow {
                label: row.extension.clone(),
                values: vec![
                    row.files.to_string(),
                    format_share(share(row.files, summary.total)),
                ],
            })
            .collect();

        let footer = TableRow {
            label: "Total".to_string(),
            values: vec![
                summary.total.to_string(),
                format_share(share(summary.total, summary.total)),
            ],
        };

        SummaryTable {
            title: "File Counts by Type".to_string(),
            headers,
            rows,
            footer,
        }
    }

    /// One row per file, labeled relative to `base` when possible.
    pub fn from_records(records: &[FileRecord], base: Option<&Path>) -> Self {
        let headers = ["File", "Created", "Code", "Comments", "Blanks", "Total"]
            .iter()
            .map(|h| h.to_string())
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                let mut values = vec![record.created.format("%Y-%m-%d").to_string()];
                values.extend(format_counts(&record.counts));
                TableRow {
                    label: relative_path_label(&record.path, base),
                    values,
                }
            })
            .collect();

        let total: LineCounts = records.iter().map(|r| r.counts).sum();
        let mut values = vec![String::new()];
        values.extend(format_counts(&total));
        let footer = TableRow {
            label: format!("Total ({})", plural(records.len(), "file", "files")),
            values,
        };

        SummaryTable {
            title: "Line Counts by File".to_string(),
            headers,
            rows,
            footer,
        }
    }

    /// Number of columns, label column included.
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

/// The tables of one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Line totals per extension
    pub by_extension: SummaryTable,
    /// Month × extension pivot
    pub by_month: SummaryTable,
    /// File counts per extension
    pub file_counts: SummaryTable,
    /// Per-file listing, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<SummaryTable>,
}

impl Report {
    /// Build the three summary tables.
    pub fn new(summaries: &Summaries) -> Self {
        Self {
            by_extension: SummaryTable::from_extension_summary(&summaries.by_extension),
            by_month: SummaryTable::from_monthly_pivot(&summaries.by_month),
            file_counts: SummaryTable::from_file_counts(&summaries.file_counts),
            files: None,
        }
    }

    /// Add a per-file table.
    pub fn with_files(mut self, records: &[FileRecord], base: Option<&Path>) -> Self {
        self.files = Some(SummaryTable::from_records(records, base));
        self
    }

    /// Tables in display order.
    pub fn tables(&self) -> Vec<&SummaryTable> {
        let mut tables = Vec::with_capacity(4);
        if let Some(files) = &self.files {
            tables.push(files);
        }
        tables.push(&self.by_extension);
        tables.push(&self.by_month);
        tables.push(&self.file_counts);
        tables
    }
}
