//! File-system helpers used around the templater: directory mirroring,
//! binary detection, raw copies and permission mirroring.
use std::fs::File;
use std::io::{self, Read as _};
use std::path::Path;

use crate::error::TreeError;

/// Number of leading bytes inspected by [`is_binary`].
pub const BINARY_PROBE_LEN: u64 = 8000;

/// Ensure `path` exists as a directory, creating it and any ancestors.
///
/// # Errors
///
/// Returns [`TreeError::CreateDir`] if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> Result<(), TreeError> {
    std::fs::create_dir_all(path).map_err(|source| TreeError::CreateDir {
        path: path.display().to_string(),
        source,
    })
}

/// Whether `buf` looks binary: it contains a NUL byte within the first
/// [`BINARY_PROBE_LEN`] bytes.
#[must_use]
pub fn buffer_is_binary(buf: &[u8]) -> bool {
    let probe = usize::try_from(BINARY_PROBE_LEN).unwrap_or(usize::MAX);
    buf.iter().take(probe).any(|&b| b == 0)
}

/// Whether the file at `path` looks binary (see [`buffer_is_binary`]).
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn is_binary(path: &Path) -> io::Result<bool> {
    let mut head = Vec::new();
    File::open(path)?
        .take(BINARY_PROBE_LEN)
        .read_to_end(&mut head)?;
    Ok(buffer_is_binary(&head))
}

/// Copy `src` to `dst` byte for byte, returning the number of bytes copied.
///
/// # Errors
///
/// Returns [`TreeError::Copy`] if the copy fails.
pub fn copy_raw(src: &Path, dst: &Path) -> Result<u64, TreeError> {
    std::fs::copy(src, dst).map_err(|source| TreeError::Copy {
        from: src.display().to_string(),
        to: dst.display().to_string(),
        source,
    })
}

/// Give `dst` the same permission bits as `src`.
///
/// # Errors
///
/// Returns [`TreeError::Permissions`] if either file's metadata cannot be
/// read or the permissions cannot be set.
pub fn copy_permissions(src: &Path, dst: &Path) -> Result<(), TreeError> {
    let to_err = |source: io::Error| TreeError::Permissions {
        path: dst.display().to_string(),
        source,
    };
    let permissions = std::fs::metadata(src).map_err(to_err)?.permissions();
    std::fs::set_permissions(dst, permissions).map_err(to_err)
}
