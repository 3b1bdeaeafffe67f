//! Error types for output path resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while preparing the output directory.
#[derive(Debug, Error)]
pub enum OutputPathError {
    /// The path exists but is a file (or something else that is not a directory).
    #[error("Output path is not a directory: {path}")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// The operator declined to create the missing directory.
    #[error("Operation cancelled by user.")]
    Cancelled {
        /// The directory that was not created.
        path: PathBuf,
    },

    /// Reading the confirmation answer failed.
    #[error("Cannot read confirmation for {path}: {source}")]
    Prompt {
        /// The directory the prompt was about.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Creating the directory (or one of its parents) failed.
    #[error("Cannot create output directory: {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl OutputPathError {
    /// Creates a not-a-directory error.
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory { path: path.into() }
    }

    /// Creates a cancellation error.
    pub fn cancelled(path: impl Into<PathBuf>) -> Self {
        Self::Cancelled { path: path.into() }
    }

    /// Creates a prompt read error.
    pub fn prompt(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Prompt {
            path: path.into(),
            source,
        }
    }

    /// Creates a directory creation error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }
}
