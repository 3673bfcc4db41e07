//! Remove files and directory trees, with protected-path guards.

use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::fsutil::{self, FileKind};
use crate::session::Session;

/// Tokens refused outright, independent of host permission bits.
const PROTECTED_TOKENS: [&str; 3] = [".", "..", "/"];

/// Run every pre-deletion check without touching the target.
///
/// The textual tokens `.`, `..` and `/`, and any path resolving to the
/// filesystem root, fail with `PermissionDenied` regardless of actual
/// permissions. Directories require `recursive`.
///
/// Callers that snapshot the target (the trash backup) validate first so
/// a protected or missing path is never copied.
pub fn validate(session: &Session, token: &str, recursive: bool) -> Result<PathBuf, AppError> {
    let path = session.resolve(token);
    let kind = fsutil::classify(&path)?;

    if PROTECTED_TOKENS.contains(&token) || is_filesystem_root(&path) {
        return Err(AppError::permission_denied(&path));
    }

    match kind {
        FileKind::File => Ok(path),
        FileKind::Directory if recursive => Ok(path),
        FileKind::Directory => Err(AppError::is_a_directory(&path)),
        FileKind::Other => Err(AppError::unsupported(&path)),
    }
}

/// Remove the target of `token` after [`validate`]-ing it.
///
/// Returns the resolved path that was removed, which the undo layer pairs
/// with its trash backup.
pub fn execute(session: &Session, token: &str, recursive: bool) -> Result<PathBuf, AppError> {
    let path = validate(session, token, recursive)?;
    let kind = fsutil::classify(&path)?;
    fsutil::remove_any(&path, kind)?;
    Ok(path)
}

fn is_filesystem_root(path: &Path) -> bool {
    path.parent().is_none()
}
