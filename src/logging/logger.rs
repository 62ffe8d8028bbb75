//! Structured logger with per-file outcome collection.
use std::sync::Mutex;

use super::types::{FileEntry, FileStatus};

/// Structured logger with summary collection.
///
/// Display methods emit [`tracing`] events that the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) renders. File
/// outcomes are collected behind a mutex so workers on several threads can
/// record into one logger.
#[derive(Debug, Default)]
pub struct Logger {
    files: Mutex<Vec<FileEntry>>,
}

impl Logger {
    /// Create a new logger with no recorded files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "dot_templater::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (shown on the console only when verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record the outcome of one file for the summary.
    pub fn record_file(&self, path: &str, status: FileStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.files.lock() {
            guard.push(FileEntry {
                path: path.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return a clone of all recorded file entries.
    #[must_use]
    pub fn file_entries(&self) -> Vec<FileEntry> {
        self.files.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count recorded files with the given status.
    #[must_use]
    pub fn count(&self, status: FileStatus) -> usize {
        self.files
            .lock()
            .map_or(0, |guard| guard.iter().filter(|f| f.status == status).count())
    }

    /// Return `true` if any recorded file has failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.count(FileStatus::Failed) > 0
    }

    /// One-line summary of recorded outcomes, e.g.
    /// `"3 files: 2 templated, 1 copied"`. Statuses with no files are left out.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let entries = self.file_entries();
        let counts: Vec<String> = FileStatus::ALL
            .iter()
            .filter_map(|&status| {
                let n = entries.iter().filter(|f| f.status == status).count();
                (n > 0).then(|| format!("{}{n} {status}\x1b[0m", status.color()))
            })
            .collect();
        let noun = if entries.len() == 1 { "file" } else { "files" };
        if counts.is_empty() {
            format!("{} {noun}", entries.len())
        } else {
            format!("{} {noun}: {}", entries.len(), counts.join(", "))
        }
    }

    /// Log the summary of all recorded files.
    ///
    /// Files that failed or carry a message are listed individually; the
    /// rest only appear in the totals, and individually at debug level.
    pub fn print_summary(&self) {
        let entries = self.file_entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");
        for entry in &entries {
            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            let line = format!(
                "{}{} {}{suffix}\x1b[0m",
                entry.status.color(),
                entry.status,
                entry.path
            );
            if entry.status == FileStatus::Failed || entry.message.is_some() {
                self.info(&line);
            } else {
                self.debug(&line);
            }
        }
        self.info(&self.summary_line());
    }
}
