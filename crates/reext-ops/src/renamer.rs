//! Per-file extension rename engine.

use std::fs;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use reext_core::{
    FileAction, Outcome, ProgressTicker, RenameError, RenameRequest, replace_extension,
    strip_extension,
};

use crate::PROGRESS_CHANNEL_SIZE;

/// Summary of a finished rename batch.
#[derive(Debug, Clone)]
pub struct RenameSummary {
    /// Number of items in the request.
    pub total: usize,
    /// Items whose move/copy succeeded.
    pub succeeded: usize,
    /// Items that failed and were skipped over.
    pub failed: usize,
    /// Whether the batch stopped on a cancellation request.
    pub cancelled: bool,
    /// Wall time for the whole batch.
    pub elapsed: Duration,
}

impl RenameSummary {
    /// Whether every attempted item succeeded.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Renamer that streams one outcome per processed file.
pub struct Renamer {
    progress_tx: broadcast::Sender<u8>,
}

impl Renamer {
    /// Create a new renamer.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_SIZE);
        Self { progress_tx }
    }

    /// Subscribe to percentage progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<u8> {
        self.progress_tx.subscribe()
    }

    /// Start a rename batch as a background task.
    ///
    /// Items are processed strictly in request order, one outcome each.
    /// The outcome channel is finalized on every exit path. A per-item
    /// failure emits [`Outcome::Failed`] and the batch continues;
    /// cancellation stops the loop after the in-flight item.
    pub fn start(
        &self,
        request: RenameRequest,
        outcomes: mpsc::Sender<Outcome>,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<RenameSummary, RenameError>> {
        let progress = self.progress_tx.clone();
        tokio::spawn(async move { rename_impl(request, outcomes, cancel, progress).await })
    }
}

impl Default for Renamer {
    fn default() -> Self {
        Self::new()
    }
}

async fn rename_impl(
    request: RenameRequest,
    outcomes: mpsc::Sender<Outcome>,
    cancel: CancellationToken,
    progress: broadcast::Sender<u8>,
) -> Result<RenameSummary, RenameError> {
    let started = Instant::now();
    let _ = progress.send(0);

    let mut ticker = ProgressTicker::new(request.relative_files.len());

    // Resolved once, before the loop.
    let root = request.root.to_string_lossy().into_owned();
    let action = request.action;
    let replacement = request.replacement().map(str::to_owned);
    let old_ext = request.old_extension.as_str();

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for rel in &request.relative_files {
        let outcome =
            process_item(&root, rel.as_str(), old_ext, replacement.as_deref(), action).await?;

        match &outcome {
            Outcome::Path(_) => succeeded += 1,
            Outcome::Failed(err) => {
                tracing::warn!(path = %err.path, error = %err.message, "item failed, continuing");
                failed += 1;
            }
        }

        if outcomes.send(outcome).await.is_err() {
            return Err(RenameError::ConsumerGone);
        }
        if let Some(percent) = ticker.tick() {
            let _ = progress.send(percent);
        }
        if cancel.is_cancelled() {
            break;
        }
    }

    let _ = progress.send(ticker.finish());

    let summary = RenameSummary {
        total: request.relative_files.len(),
        succeeded,
        failed,
        cancelled: cancel.is_cancelled(),
        elapsed: started.elapsed(),
    };
    tracing::debug!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        cancelled = summary.cancelled,
        action = %action,
        "rename batch finished"
    );
    Ok(summary)
}

/// Process one file: compute its destination and perform the move/copy.
///
/// Only a task-join failure is a run-level error; everything else folds
/// into the returned outcome.
async fn process_item(
    root: &str,
    rel: &str,
    old_ext: &str,
    replacement: Option<&str>,
    action: FileAction,
) -> Result<Outcome, RenameError> {
    let dest_rel = match replacement {
        Some(new_ext) => replace_extension(rel, old_ext, new_ext),
        None => strip_extension(rel, old_ext),
    };
    let Some(dest_rel) = dest_rel else {
        return Ok(Outcome::failed(
            rel,
            format!("extension {old_ext:?} is longer than the path"),
        ));
    };

    // Relative paths carry a leading separator, so the absolute paths
    // are plain concatenations.
    let source = format!("{root}{rel}");
    let dest = format!("{root}{dest_rel}");

    let result = tokio::task::spawn_blocking(move || apply_action(action, &source, &dest))
        .await
        .map_err(|e| RenameError::TaskFailed {
            message: e.to_string(),
        })?;

    Ok(match result {
        Ok(()) => Outcome::Path(dest_rel),
        Err(e) => Outcome::failed(rel, e.to_string()),
    })
}

/// The single-file primitive. No cross-volume fallback, no collision
/// detection; overwrite behavior is whatever the OS call does.
fn apply_action(action: FileAction, source: &str, dest: &str) -> std::io::Result<()> {
    match action {
        FileAction::Move => fs::rename(source, dest),
        FileAction::Copy => fs::copy(source, dest).map(|_| ()),
    }
}
