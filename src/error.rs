//! Error types for locating and creating config files.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocatorError {
    /// A non-forced create found a file already at the target.
    #[error("file already exists, use forced=true to overwrite: {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// Neither candidate file exists.
    #[error("config file not found in {} or {}", home.display(), program.display())]
    NotFound { home: PathBuf, program: PathBuf },

    #[error("invalid config file name {0:?}: expected a bare file name")]
    InvalidFileName(String),

    #[error("could not determine the home directory")]
    HomeDirUnavailable,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl LocatorError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, LocatorError::AlreadyExists { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LocatorError::NotFound { .. })
    }
}

/// Failure while reading a located file with the format reader.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Locate(#[from] LocatorError),

    #[error("failed to read config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("key {key:?} not found in {}", path.display())]
    MissingKey { path: PathBuf, key: String },
}
