//! Line-streaming templater: feature blocks and substitutions over a file.
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::config::Rules;
use crate::error::TemplateError;
use crate::feature::BlockFilter;

/// Line counts for one templated input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateReport {
    /// Lines read from the input.
    pub lines_read: usize,
    /// Lines written to the output.
    pub lines_written: usize,
    /// Lines passed through verbatim because they are not valid UTF-8.
    pub raw_lines: usize,
    /// Whether the input ended inside a suppressed block.
    pub unterminated_block: bool,
}

impl TemplateReport {
    /// Lines that were markers or fell inside a suppressed block.
    #[must_use]
    pub const fn lines_dropped(&self) -> usize {
        self.lines_read - self.lines_written
    }
}

/// Template `reader` into `writer` line by line.
///
/// Every line keeps its original terminator, including a missing one on the
/// final line. Lines that are not valid UTF-8 are never markers and are not
/// substituted; they are copied as-is unless a block is being suppressed.
///
/// # Errors
///
/// Returns any I/O error from reading or writing.
pub fn template_reader<R: BufRead, W: Write>(
    rules: &Rules,
    mut reader: R,
    writer: &mut W,
) -> io::Result<TemplateReport> {
    let mut report = TemplateReport::default();
    let mut filter = BlockFilter::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        report.lines_read += 1;

        match std::str::from_utf8(&buf) {
            Ok(line) => {
                if let Some(out) = filter.process(line, &rules.features, &rules.substitutions) {
                    writer.write_all(out.as_bytes())?;
                    report.lines_written += 1;
                }
            }
            Err(_) if filter.is_suppressing() => {}
            Err(_) => {
                writer.write_all(&buf)?;
                report.lines_written += 1;
                report.raw_lines += 1;
            }
        }
    }

    report.unterminated_block = filter.is_suppressing();
    Ok(report)
}

/// Template an in-memory string.
///
/// # Examples
///
/// ```
/// use dot_templater::config::Rules;
/// use dot_templater::template::template_str;
///
/// let rules = Rules::parse("GREETING=Hello\nfeatureA\n")?;
/// let source = "GREETING, world!\n### featureA\nshown\n### featureA\n### featureB\nhidden\n### featureB\n";
/// assert_eq!(template_str(&rules, source), "Hello, world!\nshown\n");
/// # Ok::<(), dot_templater::error::ConfigError>(())
/// ```
#[must_use]
pub fn template_str(rules: &Rules, content: &str) -> String {
    let mut filter = BlockFilter::new();
    content
        .split_inclusive('\n')
        .filter_map(|line| filter.process(line, &rules.features, &rules.substitutions))
        .collect()
}

/// Render the templated contents of `input` into memory.
///
/// # Errors
///
/// Returns [`TemplateError::OpenInput`] if `input` cannot be opened and
/// [`TemplateError::Io`] if reading fails.
pub fn render_file(rules: &Rules, input: &Path) -> Result<(Vec<u8>, TemplateReport), TemplateError> {
    let reader = open_input(input)?;
    let mut out = Vec::new();
    let report = template_reader(rules, reader, &mut out).map_err(|source| TemplateError::Io {
        path: input.display().to_string(),
        source,
    })?;
    Ok((out, report))
}

/// Template `input` into `output`, truncating `output` first.
///
/// The input is opened before the output, so a missing source never
/// truncates an existing destination.
///
/// # Errors
///
/// Returns [`TemplateError::OpenInput`] or [`TemplateError::OpenOutput`] if
/// either file cannot be opened, and [`TemplateError::Io`] if reading or
/// writing fails afterwards.
pub fn template_file(
    rules: &Rules,
    input: &Path,
    output: &Path,
) -> Result<TemplateReport, TemplateError> {
    let reader = open_input(input)?;
    let file = File::create(output).map_err(|source| TemplateError::OpenOutput {
        path: output.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let report = template_reader(rules, reader, &mut writer)
        .and_then(|report| writer.flush().map(|()| report))
        .map_err(|source| TemplateError::Io {
            path: input.display().to_string(),
            source,
        })?;

    if report.unterminated_block {
        tracing::debug!(
            "{}: file ended inside a suppressed block",
            input.display()
        );
    }
    Ok(report)
}

fn open_input(input: &Path) -> Result<BufReader<File>, TemplateError> {
    File::open(input)
        .map(BufReader::new)
        .map_err(|source| TemplateError::OpenInput {
            path: input.display().to_string(),
            source,
        })
}
