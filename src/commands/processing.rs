//! Per-file work over a walked tree, sequentially or on the rayon pool.
use std::ops::AddAssign;
use std::sync::Mutex;

use anyhow::Result;

use crate::logging::{FileStatus, Logger};
use crate::template::TemplateReport;
use crate::tree::{self, Entry};

/// Line and file counts accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Files rendered through the templater.
    pub templated: usize,
    /// Files copied byte for byte.
    pub copied: usize,
    /// Lines read from templated files.
    pub lines_read: usize,
    /// Lines written to templated files.
    pub lines_written: usize,
    /// Templated files that ended inside a suppressed block.
    pub unterminated: usize,
}

impl RunStats {
    /// Stats for one raw-copied file.
    #[must_use]
    pub const fn copied() -> Self {
        Self {
            templated: 0,
            copied: 1,
            lines_read: 0,
            lines_written: 0,
            unterminated: 0,
        }
    }

    /// Stats for one templated file.
    #[must_use]
    pub fn templated(report: &TemplateReport) -> Self {
        Self {
            templated: 1,
            copied: 0,
            lines_read: report.lines_read,
            lines_written: report.lines_written,
            unterminated: usize::from(report.unterminated_block),
        }
    }
}

impl AddAssign for RunStats {
    fn add_assign(&mut self, rhs: Self) {
        self.templated += rhs.templated;
        self.copied += rhs.copied;
        self.lines_read += rhs.lines_read;
        self.lines_written += rhs.lines_written;
        self.unterminated += rhs.unterminated;
    }
}

/// Create every directory entry at the destination, in walk order.
///
/// # Errors
///
/// Returns the first directory that cannot be created.
pub fn create_dirs<'a>(dirs: impl IntoIterator<Item = &'a Entry>, log: &Logger) -> Result<usize> {
    let mut count = 0;
    for entry in dirs {
        tree::fs::ensure_dir(&entry.dest)?;
        log.debug(&format!("mkdir {}", entry.relative.display()));
        count += 1;
    }
    Ok(count)
}

/// Run `work` on every file and sum the returned stats.
///
/// A failing file is recorded as [`FileStatus::Failed`] and stops the run;
/// with `parallel` set, files already in flight on other threads still
/// finish.
///
/// # Errors
///
/// Returns the first error produced by `work`.
pub fn process_files(
    files: &[&Entry],
    parallel: bool,
    log: &Logger,
    work: impl Fn(&Entry) -> Result<RunStats> + Sync + Send,
) -> Result<RunStats> {
    let work = |entry: &Entry| {
        work(entry).inspect_err(|err| {
            log.record_file(
                &entry.relative.display().to_string(),
                FileStatus::Failed,
                Some(&format!("{err:#}")),
            );
        })
    };

    if parallel {
        collect_parallel_stats(files, work)
    } else {
        let mut stats = RunStats::default();
        for &entry in files {
            stats += work(entry)?;
        }
        Ok(stats)
    }
}

/// Accumulate per-file [`RunStats`] in parallel using Rayon.
///
/// The per-file work runs without the stats lock held; the lock is taken only
/// for the counter update afterwards.
fn collect_parallel_stats(
    files: &[&Entry],
    work: impl Fn(&Entry) -> Result<RunStats> + Sync + Send,
) -> Result<RunStats> {
    use rayon::prelude::*;
    let stats = Mutex::new(RunStats::default());
    files.par_iter().try_for_each(|&entry| -> Result<()> {
        let delta = work(entry)?;
        *stats
            .lock()
            .map_err(|e| anyhow::anyhow!("stats mutex poisoned: {e}"))? += delta;
        Ok(())
    })?;
    Ok(stats
        .into_inner()
        .unwrap_or_else(std::sync::PoisonError::into_inner))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tree::EntryKind;
    use std::path::PathBuf;

    fn file(name: &str) -> Entry {
        Entry {
            source: PathBuf::from("src").join(name),
            relative: PathBuf::from(name),
            dest: PathBuf::from("dest").join(name),
            kind: EntryKind::File,
        }
    }

    fn report(read: usize, written: usize) -> TemplateReport {
        TemplateReport {
            lines_read: read,
            lines_written: written,
            ..TemplateReport::default()
        }
    }

    #[test]
    fn stats_add_up() {
        let mut stats = RunStats::templated(&report(10, 7));
        stats += RunStats::copied();
        stats += RunStats::templated(&TemplateReport {
            unterminated_block: true,
            ..report(3, 1)
        });
        assert_eq!(
            stats,
            RunStats {
                templated: 2,
                copied: 1,
                lines_read: 13,
                lines_written: 8,
                unterminated: 1,
            }
        );
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let entries: Vec<Entry> = (0..50).map(|i| file(&format!("f{i}"))).collect();
        let refs: Vec<&Entry> = entries.iter().collect();
        let work = |_: &Entry| -> Result<RunStats> { Ok(RunStats::templated(&report(2, 1))) };

        let log = Logger::new();
        let sequential = process_files(&refs, false, &log, work).unwrap();
        let parallel = process_files(&refs, true, &log, work).unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.templated, 50);
        assert_eq!(parallel.lines_read, 100);
    }

    #[test]
    fn failure_is_recorded_and_returned() {
        let entries = [file("ok"), file("bad")];
        let refs: Vec<&Entry> = entries.iter().collect();
        let log = Logger::new();

        let result = process_files(&refs, false, &log, |entry| {
            if entry.relative == PathBuf::from("bad") {
                anyhow::bail!("disk full");
            }
            Ok(RunStats::copied())
        });

        assert!(result.unwrap_err().to_string().contains("disk full"));
        assert!(log.has_failures());
        let failed = log.file_entries();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].path, "bad");
        assert_eq!(failed[0].message.as_deref(), Some("disk full"));
    }

    #[test]
    fn create_dirs_mirrors_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Entry {
            source: tmp.path().join("src/.config"),
            relative: PathBuf::from(".config"),
            dest: tmp.path().join("dest/.config/nvim"),
            kind: EntryKind::Directory,
        };
        let count = create_dirs([&dir], &Logger::new()).unwrap();
        assert_eq!(count, 1);
        assert!(dir.dest.is_dir());
    }
}
