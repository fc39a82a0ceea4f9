//! Error taxonomy shared by both tools
//!
//! Usage and validation errors are fatal and raised before any side effect.
//! Permission and I/O errors are scoped to a single operation; a move batch
//! records them per file and keeps going.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    // Invocation
    #[error("{0}")]
    Usage(String),

    #[error("destination directory is required for 'move' (or pass --subdir)")]
    MissingDestination,

    // Validation
    #[error("the path '{}' does not exist or is not a valid directory", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("the file '{}' does not exist or is not a valid file", .0.display())]
    InvalidFile(PathBuf),

    #[error("invalid destination '{}': {reason}", path.display())]
    InvalidDestination { path: PathBuf, reason: String },

    // Per-operation
    #[error("permission denied for '{}'", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ToolError {
    /// Classify an I/O failure on `path` as a permission or a generic I/O error.
    pub fn from_io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InvalidDirectory(p)
            | Self::InvalidFile(p)
            | Self::InvalidDestination { path: p, .. }
            | Self::PermissionDenied { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::Usage(_) | Self::MissingDestination => None,
        }
    }

    /// Stable machine-readable code, used by the jsonl output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usage(_) => "USAGE",
            Self::MissingDestination => "MISSING_DESTINATION",
            Self::InvalidDirectory(_) => "INVALID_DIRECTORY",
            Self::InvalidFile(_) => "INVALID_FILE",
            Self::InvalidDestination { .. } => "INVALID_DESTINATION",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::Io { .. } => "IO_ERROR",
        }
    }
}
