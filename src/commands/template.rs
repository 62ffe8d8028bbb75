//! Tree mode: template every file under the source root into the destination.
use anyhow::{Context as _, Result};

use super::processing::{self, RunStats};
use super::{RunSetup, TreePaths};
use crate::config::Rules;
use crate::logging::{FileStatus, Logger};
use crate::template;
use crate::tree::{self, Entry};

/// Walk the source tree, mirror its directories and template or copy every
/// file into the destination.
///
/// # Errors
///
/// Returns the first walk, directory, templating or copy failure.
pub fn run(setup: &RunSetup, paths: &TreePaths, log: &Logger) -> Result<()> {
    log.stage("Walking source tree");
    let entries = tree::walk(&paths.source, &paths.dest, &setup.ignore)?;
    let (dirs, files): (Vec<&Entry>, Vec<&Entry>) = entries.iter().partition(|e| e.is_dir());
    log.info(&format!(
        "{} directories, {} files from {}",
        dirs.len(),
        files.len(),
        paths.source.display()
    ));

    log.stage("Templating files");
    processing::create_dirs(dirs, log)?;
    let result = processing::process_files(&files, setup.parallel, log, |entry| {
        template_entry(&setup.rules, entry, log)
    });

    if let Err(err) = &result {
        log.error(&format!("templating stopped: {err:#}"));
    }
    log.print_summary();
    let stats = result?;
    log.debug(&format!(
        "{} of {} lines written",
        stats.lines_written, stats.lines_read
    ));
    if stats.unterminated > 0 {
        log.debug(&format!(
            "{} file(s) ended inside a suppressed feature block",
            stats.unterminated
        ));
    }
    Ok(())
}

/// Template or copy a single file and mirror its permissions.
///
/// # Errors
///
/// Returns an error if the file cannot be read, written or have its
/// permissions copied.
pub fn template_entry(rules: &Rules, entry: &Entry, log: &Logger) -> Result<RunStats> {
    let path = entry.relative.display().to_string();
    let binary = tree::fs::is_binary(&entry.source)
        .with_context(|| format!("reading {}", entry.source.display()))?;

    let stats = if binary {
        let bytes = tree::fs::copy_raw(&entry.source, &entry.dest)?;
        log.debug(&format!("copied {path} ({bytes} bytes)"));
        log.record_file(&path, FileStatus::Copied, None);
        RunStats::copied()
    } else {
        let report = template::template_file(rules, &entry.source, &entry.dest)?;
        log.debug(&format!(
            "templated {path} ({} of {} lines)",
            report.lines_written, report.lines_read
        ));
        let message = report
            .unterminated_block
            .then_some("unterminated feature block");
        log.record_file(&path, FileStatus::Templated, message);
        RunStats::templated(&report)
    };

    tree::fs::copy_permissions(&entry.source, &entry.dest)?;
    Ok(stats)
}
