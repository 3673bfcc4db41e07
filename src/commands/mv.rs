//! Move (rename) files and directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::fsutil::{self, FileKind};
use crate::session::Session;

/// Move `src_token` to `dst_token`.
///
/// Uses an atomic rename when possible and falls back to
/// copy-then-delete-source when the rename fails for a non-permission
/// reason (the cross-filesystem case). A directory destination receives the
/// source inside it under its original name.
///
/// Returns the resolved destination actually written.
pub fn execute(session: &Session, src_token: &str, dst_token: &str) -> Result<PathBuf, AppError> {
    let source = session.resolve(src_token);
    let destination = session.resolve(dst_token);

    let source_kind = fsutil::classify(&source)?;
    let target = match fsutil::classify(&destination) {
        Ok(FileKind::Directory) => destination.join(fsutil::base_name(&source)),
        _ => destination,
    };

    // Both paths are normalized, so a component prefix check catches the
    // target being the source itself or anything beneath it. Without this
    // the copy fallback would recurse into the tree it is writing.
    if target.starts_with(&source) {
        return Err(overlapping_paths(&source, &target));
    }

    match fs::rename(&source, &target) {
        Ok(()) => Ok(target),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            Err(AppError::permission_denied(&target))
        }
        Err(_) => {
            copy_then_delete(&source, &target, source_kind)?;
            Ok(target)
        }
    }
}

fn overlapping_paths(source: &Path, target: &Path) -> AppError {
    AppError::Io(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!(
            "cannot move '{}' to '{}': paths overlap",
            source.display(),
            target.display()
        ),
    ))
}

fn copy_then_delete(source: &Path, target: &Path, kind: FileKind) -> Result<(), AppError> {
    match kind {
        FileKind::File => fsutil::copy_file(source, target)?,
        FileKind::Directory => fsutil::copy_tree(source, target)?,
        FileKind::Other => return Err(AppError::unsupported(source)),
    }
    fsutil::remove_any(source, kind)
}
