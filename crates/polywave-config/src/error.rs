//! Error types for patch file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving patches.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Failed to read a patch file
    #[error("failed to read patch '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a patch file
    #[error("failed to write patch '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory for a patch file
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed patch JSON
    #[error("failed to parse patch JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No factory preset under the requested name
    #[error("preset not found: {0}")]
    PresetNotFound(String),
}

impl PatchError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
