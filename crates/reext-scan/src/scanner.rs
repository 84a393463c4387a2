//! JWalk-based extension scanner.

use std::time::{Duration, Instant};

use compact_str::CompactString;
use globset::GlobBuilder;
use jwalk::{Parallelism, WalkDir};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use reext_core::{Outcome, ProgressTicker, ScanError, ScanRequest, relative_to_root};

use crate::PROGRESS_CHANNEL_SIZE;

/// Summary of a finished scan run.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// Number of files that matched the filter.
    pub matched: usize,
    /// Number of matches actually emitted (less than `matched` when the
    /// run was cancelled mid-stream).
    pub emitted: usize,
    /// Whether the run stopped on a cancellation request.
    pub cancelled: bool,
    /// Wall time for the whole run.
    pub elapsed: Duration,
}

/// Scanner that streams root-relative matches into an outcome channel.
pub struct ExtensionScanner {
    progress_tx: broadcast::Sender<u8>,
}

impl ExtensionScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_SIZE);
        Self { progress_tx }
    }

    /// Subscribe to percentage progress updates. Which task drains the
    /// receiver is the caller's business.
    pub fn subscribe(&self) -> broadcast::Receiver<u8> {
        self.progress_tx.subscribe()
    }

    /// Start a scan as a background task.
    ///
    /// Matches are pushed into `outcomes` in walk order; the channel is
    /// finalized (sender dropped) on every exit path, so the consumer's
    /// `recv()` loop always terminates. Cancellation is observed once
    /// per emitted item.
    pub fn start(
        &self,
        request: ScanRequest,
        outcomes: mpsc::Sender<Outcome>,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<ScanSummary, ScanError>> {
        let progress = self.progress_tx.clone();
        tokio::spawn(async move { scan_impl(request, outcomes, cancel, progress).await })
    }
}

impl Default for ExtensionScanner {
    fn default() -> Self {
        Self::new()
    }
}

async fn scan_impl(
    request: ScanRequest,
    outcomes: mpsc::Sender<Outcome>,
    cancel: CancellationToken,
    progress: broadcast::Sender<u8>,
) -> Result<ScanSummary, ScanError> {
    let started = Instant::now();
    let _ = progress.send(0);

    // The walk is blocking; collect matches off the async runtime. The
    // progress math needs the total before the first emission anyway.
    let root = request.root.clone();
    let matches = tokio::task::spawn_blocking(move || collect_matches(&request))
        .await
        .map_err(|e| ScanError::Walk {
            path: root,
            message: e.to_string(),
        })??;

    let mut ticker = ProgressTicker::new(matches.len());
    let matched = matches.len();
    let mut emitted = 0usize;

    for rel in matches {
        if outcomes.send(Outcome::Path(rel)).await.is_err() {
            return Err(ScanError::ConsumerGone);
        }
        emitted += 1;
        if let Some(percent) = ticker.tick() {
            let _ = progress.send(percent);
        }
        if cancel.is_cancelled() {
            break;
        }
    }

    let _ = progress.send(ticker.finish());

    let summary = ScanSummary {
        matched,
        emitted,
        cancelled: cancel.is_cancelled(),
        elapsed: started.elapsed(),
    };
    tracing::debug!(
        matched = summary.matched,
        emitted = summary.emitted,
        cancelled = summary.cancelled,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "scan finished"
    );
    Ok(summary)
}

/// Walk the tree and collect every matching file, root-relative, in
/// deterministic (sorted) walk order.
///
/// Any walk error aborts the whole scan. Skipping just the inaccessible
/// subtree instead is a known deferred fix.
fn collect_matches(request: &ScanRequest) -> Result<Vec<CompactString>, ScanError> {
    let root = &request.root;
    if !root.is_dir() {
        return Err(ScanError::NotADirectory { path: root.clone() });
    }

    let pattern = format!("*{}", request.extension);
    let matcher = GlobBuilder::new(&pattern)
        .literal_separator(false)
        .build()
        .map_err(|e| ScanError::InvalidFilter {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?
        .compile_matcher();

    let parallelism = match request.threads {
        0 => Parallelism::RayonDefaultPool {
            busy_timeout: Duration::from_millis(100),
        },
        n => Parallelism::RayonNewPool(n),
    };

    let walker = WalkDir::new(root)
        .parallelism(parallelism)
        .skip_hidden(!request.include_hidden)
        .sort(true);

    let mut matches = Vec::new();
    for entry_result in walker {
        let entry = entry_result.map_err(|err| ScanError::Walk {
            path: err
                .path()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| root.clone()),
            message: err.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if !matcher.is_match(entry.file_name()) {
            continue;
        }
        if let Some(rel) = relative_to_root(root, &entry.path()) {
            matches.push(rel);
        }
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("x.log"), "x").unwrap();
        fs::write(root.join("y.log"), "y").unwrap();
        fs::write(root.join("z.txt"), "z").unwrap();
        fs::write(root.join("sub/deep.log"), "d").unwrap();

        temp
    }

    async fn drain(mut rx: mpsc::Receiver<Outcome>) -> Vec<Outcome> {
        let mut out = Vec::new();
        while let Some(outcome) = rx.recv().await {
            out.push(outcome);
        }
        out
    }

    fn drain_progress(rx: &mut broadcast::Receiver<u8>) -> Vec<u8> {
        let mut reports = Vec::new();
        while let Ok(percent) = rx.try_recv() {
            reports.push(percent);
        }
        reports
    }

    #[tokio::test]
    async fn test_scan_matches_only_filtered_extension() {
        let temp = create_test_tree();
        let scanner = ExtensionScanner::new();
        let (tx, rx) = mpsc::channel(100);

        let handle = scanner.start(
            ScanRequest::new(temp.path(), ".log"),
            tx,
            CancellationToken::new(),
        );
        let outcomes = drain(rx).await;
        let summary = handle.await.unwrap().unwrap();

        let mut paths: Vec<&str> = outcomes.iter().filter_map(|o| o.as_path()).collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["/sub/deep.log", "/x.log", "/y.log"]);
        assert_eq!(summary.matched, 3);
        assert_eq!(summary.emitted, 3);
        assert!(!summary.cancelled);
    }

    #[tokio::test]
    async fn test_scan_progress_starts_at_zero_ends_at_hundred() {
        let temp = create_test_tree();
        let scanner = ExtensionScanner::new();
        let mut progress_rx = scanner.subscribe();
        let (tx, rx) = mpsc::channel(100);

        let handle = scanner.start(
            ScanRequest::new(temp.path(), ".log"),
            tx,
            CancellationToken::new(),
        );
        drain(rx).await;
        handle.await.unwrap().unwrap();

        let reports = drain_progress(&mut progress_rx);
        assert_eq!(reports.first(), Some(&0));
        assert_eq!(reports.last(), Some(&100));
        assert!(reports.windows(2).all(|w| w[0] <= w[1]), "{reports:?}");
    }

    #[tokio::test]
    async fn test_scan_zero_matches_still_completes() {
        let temp = create_test_tree();
        let scanner = ExtensionScanner::new();
        let mut progress_rx = scanner.subscribe();
        let (tx, rx) = mpsc::channel(100);

        let handle = scanner.start(
            ScanRequest::new(temp.path(), ".nope"),
            tx,
            CancellationToken::new(),
        );
        let outcomes = drain(rx).await;
        let summary = handle.await.unwrap().unwrap();

        assert!(outcomes.is_empty());
        assert_eq!(summary.matched, 0);
        assert_eq!(drain_progress(&mut progress_rx), vec![0, 100]);
    }

    #[tokio::test]
    async fn test_scan_missing_root_fails_and_finalizes_queue() {
        let scanner = ExtensionScanner::new();
        let (tx, rx) = mpsc::channel(100);

        let handle = scanner.start(
            ScanRequest::new("/definitely/not/here", ".log"),
            tx,
            CancellationToken::new(),
        );
        // The drain loop must terminate even though the scan failed.
        let outcomes = drain(rx).await;
        let result = handle.await.unwrap();

        assert!(outcomes.is_empty());
        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }

    #[tokio::test]
    async fn test_scan_pre_cancelled_emits_at_most_one_item() {
        let temp = create_test_tree();
        let scanner = ExtensionScanner::new();
        let (tx, rx) = mpsc::channel(100);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let handle = scanner.start(ScanRequest::new(temp.path(), ".log"), tx, cancel);
        let outcomes = drain(rx).await;
        let summary = handle.await.unwrap().unwrap();

        // The token is observed after each emitted item.
        assert!(outcomes.len() <= 1);
        assert!(summary.cancelled);
        assert_eq!(summary.emitted, outcomes.len());
    }

    #[tokio::test]
    async fn test_scan_skips_hidden_when_asked() {
        let temp = create_test_tree();
        fs::write(temp.path().join(".hidden.log"), "h").unwrap();

        let scanner = ExtensionScanner::new();
        let (tx, rx) = mpsc::channel(100);
        let request = ScanRequest::builder()
            .root(temp.path())
            .extension(".log")
            .include_hidden(false)
            .build()
            .unwrap();

        let handle = scanner.start(request, tx, CancellationToken::new());
        let outcomes = drain(rx).await;
        handle.await.unwrap().unwrap();

        assert!(outcomes.iter().all(|o| o.as_path() != Some("/.hidden.log")));
    }
}
