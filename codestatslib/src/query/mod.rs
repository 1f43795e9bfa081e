//! Query processing: group and sum records into summaries.
//!
//! This module handles the third stage of the pipeline - turning the flat
//! list of [`FileRecord`](crate::FileRecord)s into the three summaries a
//! report shows:
//!
//! - **By extension**: line totals per extension, largest first
//! - **By month**: a month × extension pivot of line totals
//! - **File counts**: number of files per extension, largest first
//!
//! Summaries are always rebuilt from the records; nothing is updated in place.
//!
//! ## Example
//!
//! ```rust,ignore
//! use codestatslib::query::aggregate;
//!
//! let summaries = aggregate(&result.records);
//! for row in &summaries.by_extension.rows {
//!     println!("{}: {}", row.extension, row.total);
//! }
//! ```

pub mod summary;

pub use summary::{
    aggregate, ExtensionFileCount, ExtensionSummary, ExtensionTotals, FileCountSummary, MonthRow,
    MonthlyPivot, Summaries,
};
