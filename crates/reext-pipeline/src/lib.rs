//! Producer/consumer pipeline driver for reext.
//!
//! The driver owns the outcome channel for a run: it spawns a stage
//! (scanner or renamer) as the producer, drains outcomes into an
//! ordered list in exact arrival order, then awaits the producer and
//! surfaces its run-level error as a single report.
//!
//! # Example
//!
//! ```rust,no_run
//! use reext_core::{RenameRequest, ScanRequest};
//! use reext_pipeline::Pipeline;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), reext_pipeline::PipelineError> {
//! let pipeline = Pipeline::new();
//! let scan = pipeline
//!     .scan(ScanRequest::new("/srv/data", ".txt"), CancellationToken::new())
//!     .await?;
//!
//! let request = RenameRequest::builder()
//!     .root("/srv/data")
//!     .old_extension(".txt")
//!     .relative_files(scan.files)
//!     .build()
//!     .unwrap();
//! let report = pipeline.rename(request, CancellationToken::new()).await?;
//! println!("{} renamed, {} failed", report.succeeded, report.failed);
//! # Ok(())
//! # }
//! ```

mod driver;

pub use driver::{Pipeline, PipelineError, RenameReport, ScanReport};

// Re-export the request/outcome vocabulary for callers
pub use reext_core::{
    FileAction, Outcome, RenameError, RenameMode, RenameRequest, ScanError, ScanRequest,
};

/// Capacity of the outcome channel between a stage and its consumer.
pub const OUTCOME_CHANNEL_SIZE: usize = 100;
