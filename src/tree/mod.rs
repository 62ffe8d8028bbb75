//! Source tree traversal and destination path mirroring.
pub mod fs;

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::TreeError;

/// Kind of a walked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory to mirror at the destination.
    Directory,
    /// A file to template or copy.
    File,
}

/// One item of the source tree together with its mirrored destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path inside the source tree.
    pub source: PathBuf,
    /// Path relative to the source root.
    pub relative: PathBuf,
    /// Corresponding path inside the destination tree.
    pub dest: PathBuf,
    /// Whether this is a directory or a file.
    pub kind: EntryKind,
}

impl Entry {
    /// Whether this entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Paths relative to the source root that the walk skips entirely.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dot_templater::tree::IgnoreList;
///
/// let ignore = IgnoreList::new(["./.git", "scripts/"]);
/// assert!(ignore.contains(Path::new(".git")));
/// assert!(ignore.contains(Path::new("scripts")));
/// assert!(!ignore.contains(Path::new("scripts/install.sh")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    paths: Vec<PathBuf>,
}

impl IgnoreList {
    /// Build an ignore list; `.` components and trailing slashes are dropped.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            paths: paths.into_iter().map(|p| normalize(p.as_ref())).collect(),
        }
    }

    /// Whether `relative` is exactly one of the ignored paths.
    ///
    /// Children of an ignored directory are never asked about because the
    /// walk prunes the whole subtree.
    #[must_use]
    pub fn contains(&self, relative: &Path) -> bool {
        let relative = normalize(relative);
        self.paths.iter().any(|p| *p == relative)
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Walk `source` and pair every entry with its path under `dest`.
///
/// Entries come in depth-first order with siblings sorted by file name, so a
/// directory always precedes its contents. The root itself is not included.
/// Ignored paths are pruned with everything below them, and so is `dest`
/// when it lives inside `source`. Symlinks are followed.
///
/// # Errors
///
/// Returns [`TreeError::Walk`] if a directory cannot be read or a symlink
/// loop is found.
pub fn walk(source: &Path, dest: &Path, ignore: &IgnoreList) -> Result<Vec<Entry>, TreeError> {
    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let ignored = e
                .path()
                .strip_prefix(source)
                .is_ok_and(|relative| ignore.contains(relative));
            !ignored && e.path() != dest
        });

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| TreeError::Walk {
            path: err
                .path()
                .unwrap_or(source)
                .display()
                .to_string(),
            source: err,
        })?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let kind = if entry.file_type().is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(Entry {
            source: entry.path().to_path_buf(),
            relative: relative.to_path_buf(),
            dest: dest.join(relative),
            kind,
        });
    }
    Ok(entries)
}
