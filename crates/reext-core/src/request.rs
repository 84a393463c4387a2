//! Pipeline request types.

use std::path::PathBuf;

use compact_str::CompactString;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// How the renamer touches each file.
///
/// Resolved once per request, never inferred mid-loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileAction {
    /// Move the file to its new name.
    Move,
    /// Copy the file, leaving the source in place.
    Copy,
}

impl std::fmt::Display for FileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move => write!(f, "Move"),
            Self::Copy => write!(f, "Copy"),
        }
    }
}

/// Whether a rename strips the extension or swaps it for a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenameMode {
    /// Remove the matched extension, append nothing.
    Strip,
    /// Remove the matched extension and append the replacement.
    Replace,
}

/// A request to scan a directory tree for files with a given extension.
///
/// Immutable once built. Lives for exactly one pipeline run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanRequest {
    /// Root directory to scan.
    pub root: PathBuf,

    /// Extension filter, including the leading dot (e.g. ".txt").
    pub extension: String,

    /// Number of walker threads (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,
}

fn default_true() -> bool {
    true
}

impl ScanRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        validate_root(self.root.as_ref())?;
        validate_extension(self.extension.as_deref(), "extension")
    }
}

impl ScanRequest {
    /// Create a new scan request builder.
    pub fn builder() -> ScanRequestBuilder {
        ScanRequestBuilder::default()
    }

    /// Create a simple request for the common case.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            threads: 0,
            include_hidden: true,
        }
    }
}

/// A request to strip or replace the extension on a previously scanned
/// list of files.
///
/// `relative_files` must come from a prior scan over the same root and
/// extension; the renamer does not re-validate that. Each entry starts
/// with the path separator and is joined to the root by plain string
/// concatenation.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct RenameRequest {
    /// Root directory the relative paths hang off.
    pub root: PathBuf,

    /// Extension to remove, including the leading dot.
    pub old_extension: String,

    /// Replacement extension. Absent or empty means strip mode.
    #[builder(default)]
    #[serde(default)]
    pub replacement: Option<String>,

    /// Move or copy each file.
    #[builder(default = "FileAction::Move")]
    pub action: FileAction,

    /// Root-relative paths to process, in order.
    pub relative_files: Vec<CompactString>,
}

impl RenameRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        validate_root(self.root.as_ref())?;
        validate_extension(self.old_extension.as_deref(), "old_extension")
    }
}

impl RenameRequest {
    /// Create a new rename request builder.
    pub fn builder() -> RenameRequestBuilder {
        RenameRequestBuilder::default()
    }

    /// The mode this request runs in, decided by the replacement field.
    pub fn mode(&self) -> RenameMode {
        match self.replacement() {
            Some(_) => RenameMode::Replace,
            None => RenameMode::Strip,
        }
    }

    /// The replacement extension, with an empty string treated as absent.
    pub fn replacement(&self) -> Option<&str> {
        self.replacement.as_deref().filter(|r| !r.is_empty())
    }
}

fn validate_root(root: Option<&PathBuf>) -> Result<(), String> {
    match root {
        Some(root) if root.as_os_str().is_empty() => Err("Root path cannot be empty".to_string()),
        Some(_) => Ok(()),
        None => Err("Root path is required".to_string()),
    }
}

fn validate_extension(ext: Option<&str>, field: &str) -> Result<(), String> {
    match ext {
        Some("") => Err(format!("{field} cannot be empty")),
        Some(ext) if !ext.starts_with('.') => {
            Err(format!("{field} must start with '.' (got {ext:?})"))
        }
        Some(_) => Ok(()),
        None => Err(format!("{field} is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_request_builder() {
        let request = ScanRequest::builder()
            .root("/srv/data")
            .extension(".txt")
            .threads(4usize)
            .build()
            .unwrap();

        assert_eq!(request.root, PathBuf::from("/srv/data"));
        assert_eq!(request.extension, ".txt");
        assert_eq!(request.threads, 4);
        assert!(request.include_hidden);
    }

    #[test]
    fn test_scan_request_rejects_bad_extension() {
        assert!(
            ScanRequest::builder()
                .root("/srv/data")
                .extension("txt")
                .build()
                .is_err()
        );
        assert!(
            ScanRequest::builder()
                .root("/srv/data")
                .extension("")
                .build()
                .is_err()
        );
        assert!(
            ScanRequest::builder()
                .root("")
                .extension(".txt")
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_rename_mode_is_data_driven() {
        let mut request = RenameRequest::builder()
            .root("/srv/data")
            .old_extension(".txt")
            .relative_files(vec![CompactString::from("/a.txt")])
            .build()
            .unwrap();

        assert_eq!(request.mode(), RenameMode::Strip);
        assert_eq!(request.action, FileAction::Move);

        request.replacement = Some(String::new());
        assert_eq!(request.mode(), RenameMode::Strip);

        request.replacement = Some(".bak".to_string());
        assert_eq!(request.mode(), RenameMode::Replace);
        assert_eq!(request.replacement(), Some(".bak"));
    }
}
