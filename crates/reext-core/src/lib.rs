//! Core types and helpers for reext.
//!
//! This crate provides the shared vocabulary of the rename pipeline:
//! requests, per-item outcomes, run-level errors, the pure extension
//! arithmetic, and the progress cadence math.

mod error;
mod outcome;
mod path;
mod progress;
mod request;

pub use error::{RenameError, ScanError};
pub use outcome::{ItemError, Outcome};
pub use path::{relative_to_root, replace_extension, strip_extension};
pub use progress::ProgressTicker;
pub use request::{
    FileAction, RenameMode, RenameRequest, RenameRequestBuilder, ScanRequest, ScanRequestBuilder,
};
