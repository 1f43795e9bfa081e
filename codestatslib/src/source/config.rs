//! Scan configuration.
//!
//! A [`ScanConfig`] is built once and passed by reference into every entry
//! point; nothing in the library reads global state. It can be built in code
//! with the builder methods or loaded from TOML.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CodestatsError;
use crate::Result;

/// Extensions counted when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".py", ".java", ".test", ".R", ".Rmd", ".c", ".sh", ".h", ".css", ".html", ".tex", ".js",
    ".jsx", ".yml",
];

/// Path substrings pruned when none are configured.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "__pycache__",
    ".git",
    ".ipynb_checkpoints",
    "node_modules",
    "venv",
];

/// Line prefixes that mark a comment when none are configured.
pub const DEFAULT_COMMENT_PREFIXES: &[&str] = &["#", "//", "/**", "*"];

/// Extensions whose triple-quoted strings count as comments by default.
pub const DEFAULT_DOCSTRING_EXTENSIONS: &[&str] = &[".py"];

/// How docstring lines are reconciled with the per-line counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocstringAccounting {
    /// Classify every original line exactly once, tracking docstring
    /// boundaries. Counts always add up to the file's line count.
    #[default]
    Exact,
    /// Strip docstrings, count what is left, then add the docstring lines to
    /// comments and subtract one blank per docstring. Approximate; blank
    /// counts that would go negative are clamped to zero.
    Legacy,
}

impl std::str::FromStr for DocstringAccounting {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(DocstringAccounting::Exact),
            "legacy" => Ok(DocstringAccounting::Legacy),
            _ => Err(format!("unknown docstring accounting: {}", s)),
        }
    }
}

/// Everything a scan needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directories (or files) to walk
    pub roots: Vec<PathBuf>,
    /// Extensions to count, each with a leading `.`
    pub extensions: BTreeSet<String>,
    /// Substrings that prune any path containing them
    pub exclusions: Vec<String>,
    /// A stripped line starting with one of these is a comment
    pub comment_prefixes: Vec<String>,
    /// Extensions whose files get the triple-quote docstring pre-pass
    pub docstring_extensions: BTreeSet<String>,
    /// Reconciliation strategy for docstring lines
    pub docstring_accounting: DocstringAccounting,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|e| e.to_string()).collect(),
            comment_prefixes: DEFAULT_COMMENT_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            docstring_extensions: DEFAULT_DOCSTRING_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            docstring_accounting: DocstringAccounting::default(),
        }
    }
}

/// Ensure an extension carries its leading `.`.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

impl ScanConfig {
    /// Create a config with the default extensions, exclusions and comment
    /// prefixes and no roots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that matches nothing and excludes nothing.
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            extensions: BTreeSet::new(),
            exclusions: Vec::new(),
            comment_prefixes: Vec::new(),
            docstring_extensions: BTreeSet::new(),
            docstring_accounting: DocstringAccounting::default(),
        }
    }

    /// Parse a config from TOML. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: ScanConfig = toml::from_str(source)?;
        Ok(config.normalized())
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| CodestatsError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: ScanConfig =
            toml::from_str(&source).map_err(|e| CodestatsError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(config.normalized())
    }

    /// Add a root to walk.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.roots.push(path.into());
        self
    }

    /// Replace the roots.
    pub fn roots<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.roots = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Add a valid extension (`"py"` and `".py"` are equivalent).
    pub fn extension(mut self, ext: &str) -> Self {
        self.extensions.insert(normalize_extension(ext));
        self
    }

    /// Replace the valid extensions.
    pub fn extensions<S: AsRef<str>>(mut self, exts: impl IntoIterator<Item = S>) -> Self {
        self.extensions = exts
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .collect();
        self
    }

    /// Add an exclusion substring.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclusions.push(pattern.into());
        self
    }

    /// Add a comment prefix.
    pub fn comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefixes.push(prefix.into());
        self
    }

    /// Replace the comment prefixes.
    pub fn comment_prefixes<S: Into<String>>(mut self, prefixes: impl IntoIterator<Item = S>) -> Self {
        self.comment_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Add an extension whose triple-quoted strings are docstrings.
    pub fn docstring_extension(mut self, ext: &str) -> Self {
        self.docstring_extensions.insert(normalize_extension(ext));
        self
    }

    /// Set the docstring reconciliation strategy.
    pub fn docstring_accounting(mut self, accounting: DocstringAccounting) -> Self {
        self.docstring_accounting = accounting;
        self
    }

    /// Whether files with this extension are counted.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    /// The first exclusion substring found anywhere in `path`, if any.
    pub fn excluded_by(&self, path: &Path) -> Option<&str> {
        let path_str = path.to_string_lossy();
        self.exclusions
            .iter()
            .filter(|pattern| !pattern.is_empty())
            .find(|pattern| path_str.contains(pattern.as_str()))
            .map(|pattern| pattern.as_str())
    }

    /// Whether `path` or any of its ancestors is pruned.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excluded_by(path).is_some()
    }

    /// Whether a stripped line starts with a comment prefix.
    pub fn is_comment(&self, stripped: &str) -> bool {
        self.comment_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && stripped.starts_with(prefix.as_str()))
    }

    fn normalized(mut self) -> Self {
        self.extensions = self
            .extensions
            .iter()
            .map(|e| normalize_extension(e))
            .collect();
        self.docstring_extensions = self
            .docstring_extensions
            .iter()
            .map(|e| normalize_extension(e))
            .collect();
        self
    }
}
