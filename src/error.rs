use std::path::{Path, PathBuf};

use thiserror::Error;

/// Unified error type for version-sync operations
#[derive(Error, Debug)]
pub enum VersionSyncError {
    #[error("{} does not exist", .path.display())]
    MissingFile { path: PathBuf },

    #[error("Could not find `{key} = \"...\"` in {}", .path.display())]
    PatternNotFound { path: PathBuf, key: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in version-sync
pub type Result<T> = std::result::Result<T, VersionSyncError>;

impl VersionSyncError {
    /// Create a missing-file error for the given path
    pub fn missing_file(path: impl AsRef<Path>) -> Self {
        VersionSyncError::MissingFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a pattern-not-found error for the given path and key
    pub fn pattern_not_found(path: impl AsRef<Path>, key: impl Into<String>) -> Self {
        VersionSyncError::PatternNotFound {
            path: path.as_ref().to_path_buf(),
            key: key.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersionSyncError::Config(msg.into())
    }

    /// Create an operator input error with context
    pub fn input(msg: impl Into<String>) -> Self {
        VersionSyncError::Input(msg.into())
    }
}
