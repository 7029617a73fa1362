//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No document file exists for the requested ID.
    #[error("document {id} not found at {}", path.display())]
    NotFound {
        /// The requested document ID.
        id: u64,
        /// Path that was probed.
        path: PathBuf,
    },

    /// A document file already exists for the ID being written.
    #[error("document {id} already exists at {}", path.display())]
    AlreadyExists {
        /// The document ID.
        id: u64,
        /// Path of the existing file.
        path: PathBuf,
    },

    /// The ID counter file is malformed.
    #[error("ID counter corrupted: {0}")]
    Corrupted(String),

    /// The ID counter cannot be advanced any further.
    #[error("ID space exhausted")]
    IdExhausted,
}

impl StorageError {
    /// Returns true if this error reports a missing document.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
