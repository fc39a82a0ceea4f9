//! Path validation and extension utilities
//!
//! Every check here is side-effect free. A missing path is a plain `false`;
//! a permission failure while checking is reported as an error so callers
//! can tell the two apart.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::error::ToolError;

/// What a path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Missing,
    Directory,
    File,
    /// Exists but is neither (socket, fifo, device...)
    Other,
}

/// Inspect a path, following symlinks
pub fn probe(path: &Path) -> Result<PathKind, ToolError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(PathKind::Directory),
        Ok(meta) if meta.is_file() => Ok(PathKind::File),
        Ok(_) => Ok(PathKind::Other),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
        // Dangling components (e.g. a file used as a directory) mean "not there"
        Err(e) if e.kind() == io::ErrorKind::NotADirectory => Ok(PathKind::Missing),
        Err(e) => Err(ToolError::from_io(path, e)),
    }
}

pub fn exists_and_is_directory(path: &Path) -> Result<bool, ToolError> {
    Ok(probe(path)? == PathKind::Directory)
}

pub fn exists_and_is_regular_file(path: &Path) -> Result<bool, ToolError> {
    Ok(probe(path)? == PathKind::File)
}

/// Normalize a user-supplied extension: drop one leading '.', lowercase
pub fn normalize_extension(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    match lowered.strip_prefix('.') {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

/// Case-insensitive check that `name` ends with `.` + `extension`.
///
/// `extension` must already be normalized.
pub fn has_extension(name: &str, extension: &str) -> bool {
    let name = name.to_lowercase();
    name.len() > extension.len()
        && name.ends_with(extension)
        && name[..name.len() - extension.len()].ends_with('.')
}

/// Best-effort absolute form of a path, for display
pub fn absolute_display(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
