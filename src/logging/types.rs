//! Per-file outcome types collected for the run summary.
use std::fmt;

/// Outcome of one walked file.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path relative to the source root.
    pub path: String,
    /// Final status of the file.
    pub status: FileStatus,
    /// Optional detail message.
    pub message: Option<String>,
}

/// Status of a processed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileStatus {
    /// Text file rendered through the templater.
    Templated,
    /// Binary file copied verbatim.
    Copied,
    /// Diff mode: rendered output equals the destination file.
    Unchanged,
    /// Diff mode: rendered output differs from the destination file.
    Differs,
    /// Diff mode: the destination file does not exist yet.
    Missing,
    /// Diff mode: binary file, not compared.
    Skipped,
    /// Processing failed.
    Failed,
}

impl FileStatus {
    /// Every status, in summary order.
    pub const ALL: [Self; 7] = [
        Self::Templated,
        Self::Copied,
        Self::Unchanged,
        Self::Differs,
        Self::Missing,
        Self::Skipped,
        Self::Failed,
    ];

    /// Summary label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Templated => "templated",
            Self::Copied => "copied",
            Self::Unchanged => "unchanged",
            Self::Differs => "changed",
            Self::Missing => "new",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    /// ANSI colour used for this status in the summary.
    pub(super) const fn color(self) -> &'static str {
        match self {
            Self::Templated | Self::Unchanged => "\x1b[32m",
            Self::Copied | Self::Skipped => "\x1b[2m",
            Self::Differs | Self::Missing => "\x1b[33m",
            Self::Failed => "\x1b[31m",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
