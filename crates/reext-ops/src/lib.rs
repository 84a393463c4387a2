//! File rename/copy stage for reext.
//!
//! Given a list of root-relative paths from a prior scan, the renamer
//! strips or replaces each file's extension by moving or copying it,
//! streaming one outcome per item to a consumer. A single file failing
//! never aborts the batch; cancellation is observed between items.

mod renamer;

pub use renamer::{Renamer, RenameSummary};

// Re-export core types for convenience
pub use reext_core::{FileAction, Outcome, RenameError, RenameMode, RenameRequest};

/// Buffer size for the percentage progress channel.
pub const PROGRESS_CHANNEL_SIZE: usize = 128;
