//! Run-level error types for the pipeline stages.
//!
//! Per-item failures are not errors; they travel as [`crate::Outcome::Failed`]
//! and never abort a batch. These types cover the failures that end a whole
//! run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an entire scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The extension filter did not form a valid glob.
    #[error("Invalid extension filter {pattern:?}: {message}")]
    InvalidFilter { pattern: String, message: String },

    /// Walking the tree failed partway through. One inaccessible subtree
    /// aborts the whole scan; skipping it is a known deferred fix.
    #[error("Directory walk failed at {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// The consumer dropped the outcome queue mid-run.
    #[error("Outcome queue closed before the scan finished")]
    ConsumerGone,
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors that abort an entire rename batch.
///
/// A single file failing its move or copy is not one of these.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The consumer dropped the outcome queue mid-run.
    #[error("Outcome queue closed before the batch finished")]
    ConsumerGone,

    /// A blocking file operation task failed to run.
    #[error("File operation task failed: {message}")]
    TaskFailed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_classifies_by_kind() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));

        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ScanError::NotFound { .. }));

        let err = ScanError::io(
            "/test/path",
            std::io::Error::other("weird"),
        );
        assert!(matches!(err, ScanError::Io { .. }));
    }
}
