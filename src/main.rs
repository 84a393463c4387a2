//! reext - batch file-extension renamer.
//!
//! Usage:
//!   reext scan PATH -e .txt             List matching files
//!   reext strip PATH -e .txt            Remove the extension from matches
//!   reext replace PATH -e .log -w .txt  Swap the extension on matches
//!   reext --help                        Show help

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use reext_core::{FileAction, Outcome, RenameRequest, ScanRequest};
use reext_pipeline::{Pipeline, ScanReport};

#[derive(Parser)]
#[command(
    name = "reext",
    version,
    about = "Batch-rename file extensions under a directory tree",
    long_about = "reext scans a directory tree for files carrying an extension, then \
                  strips or replaces that extension by moving (or copying) each match."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit the run report as JSON instead of plain lines
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List every file under PATH carrying the extension
    Scan {
        /// Root directory to scan
        path: PathBuf,

        /// Extension filter (leading dot optional)
        #[arg(short, long)]
        extension: String,
    },
    /// Remove the extension from every matching file
    Strip {
        /// Root directory to scan
        path: PathBuf,

        /// Extension to remove (leading dot optional)
        #[arg(short, long)]
        extension: String,

        /// Copy files instead of moving them
        #[arg(long)]
        copy: bool,
    },
    /// Replace the extension on every matching file
    Replace {
        /// Root directory to scan
        path: PathBuf,

        /// Extension to replace (leading dot optional)
        #[arg(short, long)]
        extension: String,

        /// New extension (leading dot optional)
        #[arg(short = 'w', long = "with")]
        replacement: String,

        /// Copy files instead of moving them
        #[arg(long)]
        copy: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let pipeline = Pipeline::new();

    // Ctrl-C requests a cooperative stop; the in-flight item finishes
    // and the report covers everything emitted up to that point.
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("cancellation requested");
            ctrl_c.cancel();
        }
    });

    match cli.command {
        Command::Scan { path, extension } => {
            let scan = run_scan(&pipeline, path, &extension, cancel).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&scan)?);
            } else {
                for file in &scan.files {
                    println!("{file}");
                }
                eprintln!("{} files matched", scan.matched);
            }
        }
        Command::Strip {
            path,
            extension,
            copy,
        } => {
            run_rename(&pipeline, path, &extension, None, copy, cancel, cli.json).await?;
        }
        Command::Replace {
            path,
            extension,
            replacement,
            copy,
        } => {
            run_rename(
                &pipeline,
                path,
                &extension,
                Some(replacement),
                copy,
                cancel,
                cli.json,
            )
            .await?;
        }
    }

    Ok(())
}

async fn run_scan(
    pipeline: &Pipeline,
    path: PathBuf,
    extension: &str,
    cancel: CancellationToken,
) -> Result<ScanReport> {
    let request = ScanRequest::builder()
        .root(path)
        .extension(normalize_extension(extension))
        .build()?;

    let render = spawn_progress_bar(pipeline.subscribe_scan_progress(), "Scanning");
    let report = pipeline.scan(request, cancel).await;
    finish_progress_bar(render);
    Ok(report?)
}

async fn run_rename(
    pipeline: &Pipeline,
    path: PathBuf,
    extension: &str,
    replacement: Option<String>,
    copy: bool,
    cancel: CancellationToken,
    json: bool,
) -> Result<()> {
    let scan = run_scan(pipeline, path.clone(), extension, cancel.clone()).await?;
    if cancel.is_cancelled() {
        eprintln!("cancelled during scan, nothing renamed");
        return Ok(());
    }

    let request = RenameRequest::builder()
        .root(path)
        .old_extension(normalize_extension(extension))
        .replacement(replacement.map(|r| normalize_extension(&r)))
        .action(if copy {
            FileAction::Copy
        } else {
            FileAction::Move
        })
        .relative_files(scan.files)
        .build()?;

    let render = spawn_progress_bar(pipeline.subscribe_rename_progress(), "Renaming");
    let report = pipeline.rename(request, cancel).await;
    finish_progress_bar(render);
    let report = report?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &report.outcomes {
            match outcome {
                Outcome::Path(dest) => println!("{dest}"),
                Outcome::Failed(err) => eprintln!("error: {err}"),
            }
        }
        eprintln!("{}", report.summary());
    }

    if report.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Callers normalize extensions once; the pipeline stages never do.
fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// Render percentage updates on stderr until the run finishes.
fn spawn_progress_bar(
    mut progress: broadcast::Receiver<u8>,
    label: &'static str,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match progress.recv().await {
                Ok(percent) => {
                    eprint!("\r{label}... {percent:>3}%");
                    let _ = std::io::stderr().flush();
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// The progress channel outlives the run, so the renderer is stopped
/// explicitly once the report is in.
fn finish_progress_bar(render: tokio::task::JoinHandle<()>) {
    render.abort();
    eprintln!();
}
