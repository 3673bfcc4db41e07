use std::io;
use std::path::Path;

use thiserror::Error;

/// Library-wide error type for sesh operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Target path does not exist.
    #[error("{0}: No such file or directory")]
    NotFound(String),

    /// Target exists but a directory was required.
    #[error("{0}: Not a directory")]
    NotADirectory(String),

    /// Target is a directory where a regular file was required,
    /// or a directory operation was attempted without `-r`.
    #[error("{0}: Is a directory")]
    IsADirectory(String),

    /// Access refused, either by the host filesystem or by the
    /// protected-path guard.
    #[error("{path}: Permission denied")]
    PermissionDenied { path: String },

    /// Search pattern failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Path is neither a regular file nor a directory (device, socket, ...).
    #[error("{0}: unsupported file type")]
    UnsupportedFileType(String),

    /// Unknown archive format, or the archive content is corrupt.
    #[error("invalid or corrupt archive format: {0}")]
    InvalidArchiveFormat(String),
}

impl AppError {
    pub(crate) fn not_found(path: &Path) -> Self {
        AppError::NotFound(path.display().to_string())
    }

    pub(crate) fn not_a_directory(path: &Path) -> Self {
        AppError::NotADirectory(path.display().to_string())
    }

    pub(crate) fn is_a_directory(path: &Path) -> Self {
        AppError::IsADirectory(path.display().to_string())
    }

    pub(crate) fn permission_denied(path: &Path) -> Self {
        AppError::PermissionDenied { path: path.display().to_string() }
    }

    pub(crate) fn unsupported(path: &Path) -> Self {
        AppError::UnsupportedFileType(path.display().to_string())
    }

    /// Provide an `io::ErrorKind`-like view for callers that dispatch on kind.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::NotFound(_) => io::ErrorKind::NotFound,
            AppError::NotADirectory(_) => io::ErrorKind::NotADirectory,
            AppError::IsADirectory(_) => io::ErrorKind::IsADirectory,
            AppError::PermissionDenied { .. } => io::ErrorKind::PermissionDenied,
            AppError::InvalidPattern { .. } | AppError::UnsupportedFileType(_) => {
                io::ErrorKind::InvalidInput
            }
            AppError::InvalidArchiveFormat(_) => io::ErrorKind::InvalidData,
        }
    }

    /// Map a mid-operation I/O failure: permission problems are re-signaled
    /// uniformly as `PermissionDenied`, a vanished target as `NotFound`,
    /// everything else stays a generic I/O wrap.
    pub(crate) fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => AppError::permission_denied(path),
            io::ErrorKind::NotFound => AppError::not_found(path),
            _ => AppError::Io(err),
        }
    }
}
