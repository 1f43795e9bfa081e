//! Output formatting: present summaries as tables.
//!
//! This module handles the fourth and final stage of the pipeline -
//! formatting summaries for display. It provides:
//!
//! - **SummaryTable**: headers, rows and a footer, all as display strings
//! - **Report**: the three summary tables (plus an optional per-file table)
//!
//! Tables are pure presentation data. Grouping and sorting happen in the
//! query stage; drawing happens in whatever consumes the tables.
//!
//! ## Example
//!
//! ```rust,ignore
//! use codestatslib::output::Report;
//!
//! let report = Report::new(&summaries);
//! // report.by_extension.headers: ["Extension", "Code", "Comments", ...]
//! // report.by_extension.footer: TableRow { label: "Total (3 extensions)", ... }
//! ```

pub mod table;

pub use table::{Report, SummaryTable, TableRow};
