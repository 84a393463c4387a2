//! Directory scanning stage for reext.
//!
//! This crate walks a directory tree looking for files that carry a
//! given extension, and streams each match's root-relative path into an
//! outcome channel while reporting percentage progress on the side.
//!
//! # Example
//!
//! ```rust,no_run
//! use reext_core::ScanRequest;
//! use reext_scan::ExtensionScanner;
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() {
//! let scanner = ExtensionScanner::new();
//!
//! let (tx, mut rx) = mpsc::channel(100);
//! let handle = scanner.start(
//!     ScanRequest::new("/srv/data", ".txt"),
//!     tx,
//!     CancellationToken::new(),
//! );
//!
//! while let Some(outcome) = rx.recv().await {
//!     println!("match: {outcome}");
//! }
//! let summary = handle.await.unwrap().unwrap();
//! println!("{} files matched", summary.matched);
//! # }
//! ```

mod scanner;

pub use scanner::{ExtensionScanner, ScanSummary};

// Re-export core types for convenience
pub use reext_core::{Outcome, ScanError, ScanRequest};

/// Buffer size for the percentage progress channel. A run emits at most
/// ~102 reports, so subscribers that only drain at the end still see
/// the full sequence.
pub const PROGRESS_CHANNEL_SIZE: usize = 128;
