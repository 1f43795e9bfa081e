//! Data collection: classify lines and build per-file records.
//!
//! This module handles the second stage of the pipeline. It provides:
//!
//! - **Classification**: split a file's lines into code, comment and blank
//! - **Records**: [`FileRecord`], one immutable row per scanned file
//! - **Scanning**: walk the configured roots and record every valid file
//!
//! ## Example
//!
//! ```rust,ignore
//! use codestatslib::data::scan;
//!
//! let result = scan(&config)?;
//! println!("{} files, {} lines", result.records.len(), result.total().total());
//! ```

pub mod classifier;
pub mod record;
pub mod scanner;

pub use classifier::{classify, BlockCommentStyle, Classification};
pub use record::{FileRecord, LineCounts};
pub use scanner::{count_file, scan, scan_file, ScanResult};
