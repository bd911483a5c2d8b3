//! Error types for textvault-backup

use crate::state::ArchiveState;
use thiserror::Error;

/// Result type alias using textvault-backup's error type
pub type Result<T> = std::result::Result<T, BackupError>;

/// Errors raised while creating or restoring archives
#[derive(Error, Debug)]
pub enum BackupError {
    /// Reading or writing the archive failed
    #[error("Archive I/O error at {path}: {source}")]
    ArchiveIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An entry would be extracted outside the destination tree
    #[error("Archive entry '{entry}' would escape the destination: {reason}")]
    PathTraversal { entry: String, reason: String },

    /// Device, FIFO or other entry that is not a file, directory or link
    #[error("Archive entry '{entry}' has unsupported type: {kind}")]
    UnsupportedEntry { entry: String, kind: String },

    /// Archive file does not exist
    #[error("Archive not found: {path}")]
    ArchiveNotFound { path: String },

    /// Archive bytes changed since the handle was issued
    #[error("Checksum mismatch for {path}: expected {expected}, found {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// Operation not allowed in the manager's current state
    #[error("Cannot move archive manager from {from} to {to}")]
    InvalidTransition { from: ArchiveState, to: ArchiveState },

    /// Error from textvault-core
    #[error(transparent)]
    Core(#[from] textvault_core::Error),
}

impl BackupError {
    /// Create an archive I/O error
    pub fn archive_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ArchiveIo {
            path: path.into(),
            source,
        }
    }

    /// Create a path traversal error
    pub fn path_traversal(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PathTraversal {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported entry error
    pub fn unsupported_entry(entry: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedEntry {
            entry: entry.into(),
            kind: kind.into(),
        }
    }
}
