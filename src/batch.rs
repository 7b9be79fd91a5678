//! Batch driver
//!
//! Discovers input PDFs and runs one pipeline per file on a bounded pool of
//! blocking workers. A failing file never stops its siblings.

use crate::error::{Error, Result};
use crate::pipeline::{FileReport, SplitPipeline};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome of one file's pipeline
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub result: Result<FileReport>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(_) => write!(f, "Success"),
            Err(e) => write!(f, "Error: {}", e),
        }
    }
}

/// List regular files in `dir` whose name ends in `.pdf` (any case).
///
/// Not recursive. `pattern` is an optional glob applied to the file name.
/// Results are sorted by path.
pub fn discover_pdfs(dir: &Path, pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = pattern
        .map(|p| {
            glob::Pattern::new(p).map_err(|e| Error::Config {
                reason: format!("invalid source pattern {:?}: {}", p, e),
            })
        })
        .transpose()?;

    let entries = std::fs::read_dir(dir).map_err(|e| Error::SourceDirectory {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue, // Skip entries we can't read
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if !name.to_lowercase().ends_with(".pdf") {
            continue;
        }
        if let Some(ref pat) = pattern {
            if !pat.matches(&name) {
                continue;
            }
        }

        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Process every file, at most `worker_count` at a time.
///
/// Outcomes are returned in input order, one per file.
pub async fn run_batch(pipeline: Arc<SplitPipeline>, files: Vec<PathBuf>) -> Vec<FileOutcome> {
    let workers = pipeline.config().worker_count();
    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();

    tracing::info!(files = files.len(), workers, "starting batch");

    for (order, source) in files.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let pipeline = Arc::clone(&pipeline);

        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let result = Err(Error::TaskJoin {
                        reason: e.to_string(),
                    });
                    return (order, FileOutcome { source, result });
                }
            };

            let path = source.clone();
            let result = tokio::task::spawn_blocking(move || pipeline.process_file(&path))
                .await
                .map_err(|e| Error::TaskJoin {
                    reason: e.to_string(),
                })
                .and_then(|r| r);

            if let Err(ref e) = result {
                tracing::warn!(file = %source.display(), error = %e, "split failed");
            }

            (order, FileOutcome { source, result })
        });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(entry) => outcomes.push(entry),
            Err(e) => tracing::error!(error = %e, "batch task aborted"),
        }
    }

    outcomes.sort_by_key(|(order, _)| *order);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

/// Discover and process every PDF in the configured source directory.
pub async fn run_source_dir(pipeline: Arc<SplitPipeline>) -> Result<Vec<FileOutcome>> {
    let config = pipeline.config();
    let files = discover_pdfs(&config.source_dir, config.source_pattern.as_deref())?;
    Ok(run_batch(pipeline, files).await)
}
