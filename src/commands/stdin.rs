//! Stdin mode: template standard input to standard output.
use std::io::{self, BufRead, BufWriter, Write};

use anyhow::{Context as _, Result};

use super::RunSetup;
use crate::config::Rules;
use crate::logging::Logger;
use crate::template::{self, TemplateReport};

/// Template standard input to standard output.
///
/// # Errors
///
/// Returns an error if reading standard input or writing standard output
/// fails.
pub fn run(setup: &RunSetup, log: &Logger) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    template_stream(&setup.rules, stdin.lock(), &mut out, log)?;
    Ok(())
}

/// Template `reader` into `writer` and flush it.
///
/// # Errors
///
/// Returns an error if reading, writing or flushing fails.
pub fn template_stream<R: BufRead, W: Write>(
    rules: &Rules,
    reader: R,
    writer: &mut W,
    log: &Logger,
) -> Result<TemplateReport> {
    let report = template::template_reader(rules, reader, writer)
        .and_then(|report| writer.flush().map(|()| report))
        .context("templating standard input")?;

    log.debug(&format!(
        "{} of {} lines written",
        report.lines_written, report.lines_read
    ));
    if report.unterminated_block {
        log.debug("input ended inside a suppressed feature block");
    }
    Ok(report)
}
