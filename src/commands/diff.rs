//! Diff mode: show what a tree run would change without writing anything.
use std::fmt::Write as _;
use std::io::{self, Write as _};

use anyhow::{Context as _, Result};
use similar::{ChangeTag, DiffTag, TextDiff};

use super::{RunSetup, TreePaths};
use crate::config::Rules;
use crate::logging::{FileStatus, Logger};
use crate::template;
use crate::tree::{self, Entry};

/// Lines of unchanged context around each hunk.
pub const CONTEXT_LINES: usize = 3;

/// Comparison of one source file against its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Path relative to the source root.
    pub path: String,
    /// Outcome of the comparison.
    pub status: FileStatus,
    /// Unified diff, present when the status is [`FileStatus::Differs`].
    pub patch: Option<String>,
}

/// Compare every file under the source root with its destination and print
/// a unified diff for each one that would change.
///
/// Files are rendered in parallel when enabled; diffs are printed in walk
/// order.
///
/// # Errors
///
/// Returns an error if the walk fails, a source cannot be rendered, or a
/// destination exists but cannot be read.
pub fn run(setup: &RunSetup, paths: &TreePaths, log: &Logger) -> Result<()> {
    use rayon::prelude::*;

    log.stage("Comparing with destination");
    let entries = tree::walk(&paths.source, &paths.dest, &setup.ignore)?;
    let files: Vec<&Entry> = entries.iter().filter(|e| !e.is_dir()).collect();

    let diffs = if setup.parallel {
        files
            .par_iter()
            .map(|&entry| diff_entry(&setup.rules, entry))
            .collect::<Result<Vec<_>>>()?
    } else {
        files
            .iter()
            .map(|&entry| diff_entry(&setup.rules, entry))
            .collect::<Result<Vec<_>>>()?
    };

    let mut out = io::stdout().lock();
    for diff in &diffs {
        if let Some(patch) = &diff.patch {
            out.write_all(patch.as_bytes())
                .context("writing diff to stdout")?;
        }
        let message = match diff.status {
            FileStatus::Missing => Some("would be created"),
            FileStatus::Skipped => Some("binary, not compared"),
            _ => None,
        };
        log.record_file(&diff.path, diff.status, message);
    }
    out.flush().context("writing diff to stdout")?;

    log.print_summary();
    Ok(())
}

/// Render `entry` and compare it with the file at its destination.
///
/// # Errors
///
/// Returns an error if the source cannot be read or rendered, or the
/// destination exists but cannot be read.
pub fn diff_entry(rules: &Rules, entry: &Entry) -> Result<FileDiff> {
    let path = entry.relative.display().to_string();
    let binary = tree::fs::is_binary(&entry.source)
        .with_context(|| format!("reading {}", entry.source.display()))?;
    if binary {
        return Ok(FileDiff {
            path,
            status: FileStatus::Skipped,
            patch: None,
        });
    }

    let (rendered, _) = template::render_file(rules, &entry.source)?;
    let existing = match std::fs::read(&entry.dest) {
        Ok(existing) => existing,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(FileDiff {
                path,
                status: FileStatus::Missing,
                patch: None,
            });
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading {}", entry.dest.display()));
        }
    };

    if existing == rendered {
        return Ok(FileDiff {
            path,
            status: FileStatus::Unchanged,
            patch: None,
        });
    }

    let patch = unified_diff(
        &String::from_utf8_lossy(&existing),
        &String::from_utf8_lossy(&rendered),
        &path,
    );
    Ok(FileDiff {
        path,
        status: FileStatus::Differs,
        patch: Some(patch),
    })
}

/// Format a unified diff from `old` (the destination) to `new` (the rendered
/// source), with `a/` and `b/` headers naming `path`. Identical inputs
/// produce the headers only.
#[must_use]
pub fn unified_diff(old: &str, new: &str, path: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = format!("--- a/{path}\n+++ b/{path}\n");

    for group in diff.grouped_ops(CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        if group.iter().all(|op| op.tag() == DiffTag::Equal) {
            continue;
        }
        let old_range = first.old_range().start..last.old_range().end;
        let new_range = first.new_range().start..last.new_range().end;
        let _ = writeln!(
            out,
            "@@ -{} +{} @@",
            hunk_range(old_range.start, old_range.len()),
            hunk_range(new_range.start, new_range.len())
        );

        for op in &group {
            for change in diff.iter_changes(op) {
                let prefix = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                out.push(prefix);
                out.push_str(change.value());
                if change.missing_newline() {
                    out.push_str("\n\\ No newline at end of file\n");
                }
            }
        }
    }
    out
}

fn hunk_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{start},0"),
        1 => (start + 1).to_string(),
        _ => format!("{},{len}", start + 1),
    }
}
