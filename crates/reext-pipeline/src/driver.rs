//! Pipeline orchestration: one producer, one consumer, ordered drain.

use compact_str::CompactString;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use reext_core::{Outcome, RenameError, RenameRequest, ScanError, ScanRequest};
use reext_ops::Renamer;
use reext_scan::ExtensionScanner;

use crate::OUTCOME_CHANNEL_SIZE;

/// A run-level pipeline failure: per-item failures never surface here,
/// they live in the outcome list.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The scan stage aborted.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The rename stage aborted.
    #[error(transparent)]
    Rename(#[from] RenameError),

    /// The producer task itself failed to run.
    #[error("Pipeline task failed: {message}")]
    TaskFailed { message: String },
}

/// Result of a driven scan run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Root-relative matches, in the exact order the scanner emitted them.
    pub files: Vec<CompactString>,
    /// Total number of files that matched the filter.
    pub matched: usize,
    /// Whether the run stopped on a cancellation request.
    pub cancelled: bool,
    /// Wall time of the run, in milliseconds.
    pub elapsed_ms: u64,
}

/// Result of a driven rename run.
#[derive(Debug, Clone, Serialize)]
pub struct RenameReport {
    /// One outcome per processed item, in the exact order they were emitted.
    pub outcomes: Vec<Outcome>,
    /// Items whose move/copy succeeded.
    pub succeeded: usize,
    /// Items that failed and were skipped over.
    pub failed: usize,
    /// Whether the run stopped on a cancellation request.
    pub cancelled: bool,
    /// Wall time of the run, in milliseconds.
    pub elapsed_ms: u64,
}

impl RenameReport {
    /// A one-line human-readable summary of the run.
    pub fn summary(&self) -> String {
        if self.failed == 0 {
            format!("Processed {} files", self.succeeded)
        } else {
            format!("Processed {} files, {} failed", self.succeeded, self.failed)
        }
    }
}

/// Driver holding the two pipeline stages.
///
/// Each call to [`Pipeline::scan`] or [`Pipeline::rename`] is one run
/// with its own outcome channel. Runs are meant to be sequential per
/// target list; keeping them so is the caller's job, the driver holds
/// no busy flag.
pub struct Pipeline {
    scanner: ExtensionScanner,
    renamer: Renamer,
}

impl Pipeline {
    /// Create a new pipeline driver.
    pub fn new() -> Self {
        Self {
            scanner: ExtensionScanner::new(),
            renamer: Renamer::new(),
        }
    }

    /// Subscribe to scan progress percentages.
    pub fn subscribe_scan_progress(&self) -> broadcast::Receiver<u8> {
        self.scanner.subscribe()
    }

    /// Subscribe to rename progress percentages.
    pub fn subscribe_rename_progress(&self) -> broadcast::Receiver<u8> {
        self.renamer.subscribe()
    }

    /// Run a scan to completion, draining matches in arrival order.
    pub async fn scan(
        &self,
        request: ScanRequest,
        cancel: CancellationToken,
    ) -> Result<ScanReport, PipelineError> {
        let (tx, mut rx) = mpsc::channel(OUTCOME_CHANNEL_SIZE);
        let handle = self.scanner.start(request, tx, cancel);

        // The scanner only ever emits successful matches.
        let mut files = Vec::new();
        while let Some(outcome) = rx.recv().await {
            if let Outcome::Path(path) = outcome {
                files.push(path);
            }
        }
        tracing::debug!(files = files.len(), "scan drain complete");

        let summary = handle
            .await
            .map_err(|e| PipelineError::TaskFailed {
                message: e.to_string(),
            })??;

        Ok(ScanReport {
            files,
            matched: summary.matched,
            cancelled: summary.cancelled,
            elapsed_ms: summary.elapsed.as_millis() as u64,
        })
    }

    /// Run a rename batch to completion, draining outcomes in arrival
    /// order. The outcome list is complete even when the producer was
    /// cancelled early, because the stage finalizes the queue on every
    /// exit path.
    pub async fn rename(
        &self,
        request: RenameRequest,
        cancel: CancellationToken,
    ) -> Result<RenameReport, PipelineError> {
        let (tx, mut rx) = mpsc::channel(OUTCOME_CHANNEL_SIZE);
        let handle = self.renamer.start(request, tx, cancel);

        let mut outcomes = Vec::new();
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }
        tracing::debug!(outcomes = outcomes.len(), "rename drain complete");

        let summary = handle
            .await
            .map_err(|e| PipelineError::TaskFailed {
                message: e.to_string(),
            })??;

        Ok(RenameReport {
            outcomes,
            succeeded: summary.succeeded,
            failed: summary.failed,
            cancelled: summary.cancelled,
            elapsed_ms: summary.elapsed.as_millis() as u64,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
