//! Per-item pipeline outcomes.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A failure on a single file, carrying the failing path and the
/// underlying error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    /// Root-relative path of the file that failed.
    pub path: CompactString,
    /// A human-readable error message.
    pub message: String,
}

impl ItemError {
    /// Create a new item error.
    pub fn new(path: impl Into<CompactString>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// One item's result, streamed from a pipeline stage to its consumer.
///
/// Success carries the root-relative path (the match for a scan, the
/// destination for a rename). Failure keeps the path and cause instead
/// of collapsing to an opaque marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The item succeeded; payload is its root-relative path.
    Path(CompactString),
    /// The item failed; the batch continues.
    Failed(ItemError),
}

impl Outcome {
    /// Create a success outcome.
    pub fn path(path: impl Into<CompactString>) -> Self {
        Self::Path(path.into())
    }

    /// Create a failure outcome.
    pub fn failed(path: impl Into<CompactString>, message: impl Into<String>) -> Self {
        Self::Failed(ItemError::new(path, message))
    }

    /// Whether this outcome is a success.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    /// The successful relative path, if any.
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Path(p) => Some(p.as_str()),
            Self::Failed(_) => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{p}"),
            Self::Failed(e) => write!(f, "Error: {e}"),
        }
    }
}
