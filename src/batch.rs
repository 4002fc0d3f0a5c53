//! Bookkeeping for commands that handle several files in one run.
//!
//! Files are processed one after another in sorted order. Per-file failures
//! are recorded and reported at the end; a fatal error stops the run.

use crate::error::{CvTexError, Result};
use crate::logger::Logger;
use std::path::{Path, PathBuf};

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Generated(PathBuf),
    /// Would have been generated; nothing was written.
    Planned(PathBuf),
    Skipped(String),
}

/// Counters and failure list of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    generated: Vec<PathBuf>,
    planned: Vec<PathBuf>,
    skipped: usize,
    failures: Vec<(String, String)>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Generated(path) => self.generated.push(path),
            Outcome::Planned(path) => self.planned.push(path),
            Outcome::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn add_failure(&mut self, name: String, error: String) {
        self.failures.push((name, error));
    }

    pub fn generated(&self) -> &[PathBuf] {
        &self.generated
    }

    pub fn planned(&self) -> &[PathBuf] {
        &self.planned
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }

    /// Report completion and log failures
    pub fn report(&self, operation: &str) {
        Logger::batch_complete(self.generated.len(), self.skipped, self.failures.len(), operation);
        if !self.planned.is_empty() {
            Logger::stats("Dry run, files not written:", &self.planned.len().to_string());
        }
        Logger::batch_failures(&self.failures);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Runs `process_fn` over `files` in order, recording every outcome.
///
/// Non-fatal errors are recorded against the file and the run continues;
/// a fatal error is returned immediately.
pub fn process_files<F>(files: &[PathBuf], mut process_fn: F) -> Result<BatchReport>
where
    F: FnMut(&Path) -> Result<Outcome>,
{
    let total = files.len();
    let mut report = BatchReport::new();

    for (index, file) in files.iter().enumerate() {
        Logger::separator();
        Logger::progress(&format!("{}/{}", index + 1, total), &file.display().to_string());

        match process_fn(file) {
            Ok(Outcome::Skipped(reason)) => {
                Logger::warning(&reason);
                report.record(Outcome::Skipped(reason));
            }
            Ok(outcome) => report.record(outcome),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                Logger::error(&e.to_string());
                report.add_failure(display_name(file), e.to_string());
            }
        }
    }

    Ok(report)
}

/// Sorted `*.md` files directly inside `dir`.
pub fn markdown_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CvTexError::ContentDirMissing(dir.to_path_buf()));
    }
    let entries = std::fs::read_dir(dir).map_err(|e| CvTexError::io(dir, e))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(CvTexError::NoMarkdownFiles(dir.to_path_buf()));
    }
    Ok(files)
}
