//! Error types for codestatslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning and counting
#[derive(Error, Debug)]
pub enum CodestatsError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read file timestamps
    #[error("failed to read metadata for '{path}': {source}")]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory traversal failed somewhere below a root
    #[error("failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Failed to read a configuration file
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for a scan config
    #[error("invalid config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Configuration text is not valid TOML for a scan config
    #[error("invalid config: {0}")]
    ConfigSyntax(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
