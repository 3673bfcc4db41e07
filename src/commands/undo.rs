//! Reverse the most recent destructive operation.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::AppError;
use crate::fsutil::{self, FileKind};
use crate::history::{HistoryService, UndoEntry};

/// Pop one undo descriptor and reverse it.
///
/// Returns a description of what was undone, or `None` when the stack is
/// empty (a normal outcome, not an error).
pub fn execute(history: &mut HistoryService) -> Result<Option<String>, AppError> {
    let Some(entry) = history.pop_undo() else {
        return Ok(None);
    };

    match entry {
        UndoEntry::Copy { destination, recursive } => {
            remove_copy(&destination, recursive)?;
            Ok(Some(format!("removed copy {}", destination.display())))
        }
        UndoEntry::Move { source, destination } => {
            move_back(&destination, &source)?;
            Ok(Some(format!("moved {} back to {}", destination.display(), source.display())))
        }
        UndoEntry::Remove { source, backup, recursive: _ } => {
            // The backup may be missing when the source vanished before the
            // snapshot was taken; restoring nothing is then the right call.
            if backup.exists() {
                move_back(&backup, &source)?;
                Ok(Some(format!("restored {}", source.display())))
            } else {
                tracing::warn!(backup = %backup.display(), "no trash backup to restore");
                Ok(Some(format!("no backup found for {}", source.display())))
            }
        }
    }
}

fn remove_copy(destination: &Path, recursive: bool) -> Result<(), AppError> {
    match fsutil::classify(destination)? {
        FileKind::File => fsutil::remove_any(destination, FileKind::File),
        FileKind::Directory if recursive => fsutil::remove_any(destination, FileKind::Directory),
        FileKind::Directory => Err(AppError::is_a_directory(destination)),
        FileKind::Other => Err(AppError::unsupported(destination)),
    }
}

/// Rename with a copy-then-delete fallback, for trash areas or move
/// destinations on another filesystem.
fn move_back(from: &Path, to: &Path) -> Result<(), AppError> {
    let kind = fsutil::classify(from)?;
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            Err(AppError::permission_denied(to))
        }
        Err(_) => {
            match kind {
                FileKind::File => fsutil::copy_file(from, to)?,
                FileKind::Directory => fsutil::copy_tree(from, to)?,
                FileKind::Other => return Err(AppError::unsupported(from)),
            }
            fsutil::remove_any(from, kind)
        }
    }
}
