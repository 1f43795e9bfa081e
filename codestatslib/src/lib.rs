//! # codestatslib
//!
//! Walks directory trees, counts code, comment and blank lines per file, and
//! summarizes the counts by file extension and by month.
//!
//! ## Overview
//!
//! The library is a small pipeline:
//!
//! - **source**: [`ScanConfig`] and the tree walker that finds files to count
//! - **data**: the line classifier and the scanner that turns files into
//!   [`FileRecord`]s
//! - **query**: [`aggregate`] builds the three summaries from records
//! - **output**: table-ready structures for whatever renders the summaries
//!
//! Lines are classified by prefix only: a stripped line is blank, a comment
//! if it starts with one of the configured comment prefixes, or code.
//! Python files (or any extension listed in
//! [`ScanConfig::docstring_extensions`]) also get their triple-quoted strings
//! counted as comment lines.
//!
//! ## Example
//!
//! ```rust
//! use codestatslib::{aggregate, scan, ScanConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("app.py"), "\"\"\"Module docs.\"\"\"\nimport os\n\n# setup\nos.getcwd()\n").unwrap();
//! fs::create_dir(dir.path().join("node_modules")).unwrap();
//! fs::write(dir.path().join("node_modules/dep.js"), "module.exports = 1;\n").unwrap();
//!
//! let config = ScanConfig::new().root(dir.path());
//! let result = scan(&config).unwrap();
//! assert_eq!(result.records.len(), 1);
//!
//! let counts = result.records[0].counts;
//! assert_eq!((counts.code, counts.comment, counts.blank), (2, 2, 1));
//!
//! let summaries = aggregate(&result.records);
//! assert_eq!(summaries.by_extension.rows[0].extension, ".py");
//! ```

pub mod data;
pub mod error;
pub mod output;
pub mod query;
pub mod source;

pub use data::{
    classify, count_file, scan, scan_file, BlockCommentStyle, Classification, FileRecord,
    LineCounts, ScanResult,
};
pub use error::CodestatsError;
pub use output::{Report, SummaryTable, TableRow};
pub use query::{
    aggregate, ExtensionFileCount, ExtensionSummary, ExtensionTotals, FileCountSummary,
    MonthRow, MonthlyPivot, Summaries,
};
pub use source::{walk, walk_roots, DocstringAccounting, ScanConfig};

/// Result type for codestatslib operations
pub type Result<T> = std::result::Result<T, CodestatsError>;
