//! Source discovery: what to scan and which files to count.
//!
//! This module handles the first stage of the pipeline. It provides:
//!
//! - **Configuration**: [`ScanConfig`], the immutable description of a scan
//! - **Tree walking**: find files under the configured roots, pruning
//!   excluded subtrees and keeping only valid extensions
//!
//! ## Example
//!
//! ```rust,ignore
//! use codestatslib::source::{walk_roots, ScanConfig};
//!
//! let config = ScanConfig::new().root("src").exclude("generated");
//! let files = walk_roots(&config)?;
//! ```

pub mod config;
pub mod walker;

pub use config::{DocstringAccounting, ScanConfig};
pub use walker::{extension_of, walk, walk_roots};
