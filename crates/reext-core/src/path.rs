//! Pure path arithmetic for the rename pipeline.
//!
//! Extensions are removed by trimming a fixed suffix length, not by
//! parsing the file name. Callers guarantee the path actually ends with
//! the extension; these functions only guard the trim itself.

use std::path::{MAIN_SEPARATOR, Path};

use compact_str::{CompactString, format_compact};

/// Remove the last `old_ext.len()` bytes from `path`.
///
/// Returns `None` when the path is shorter than the extension or the cut
/// would land inside a multi-byte character. Stripping an empty
/// extension is a no-op.
pub fn strip_extension(path: &str, old_ext: &str) -> Option<CompactString> {
    let cut = path.len().checked_sub(old_ext.len())?;
    if !path.is_char_boundary(cut) {
        return None;
    }
    Some(CompactString::from(&path[..cut]))
}

/// Remove the last `old_ext.len()` bytes from `path` and append
/// `new_ext` verbatim.
///
/// No separator normalization happens here; the caller normalizes the
/// replacement once before the batch starts.
pub fn replace_extension(path: &str, old_ext: &str, new_ext: &str) -> Option<CompactString> {
    let mut out = strip_extension(path, old_ext)?;
    out.push_str(new_ext);
    Some(out)
}

/// Express `full` relative to `root`, with a leading path separator.
///
/// Returns `None` when `full` does not live under `root`.
pub fn relative_to_root(root: &Path, full: &Path) -> Option<CompactString> {
    let rel = full.strip_prefix(root).ok()?;
    Some(format_compact!("{MAIN_SEPARATOR}{}", rel.display()))
}
