//! Shared filesystem helpers used by the command modules and the
//! history/undo subsystem.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::AppError;

/// Closed classification of a filesystem object.
///
/// Each operation queries the type once and switches on the result instead
/// of chaining `is_file`/`is_dir` probes, so there is a single stat per
/// decision and no check-then-use race between probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

/// Classify `path`, following symbolic links.
///
/// Returns `NotFound` when the path (or a dangling link target) does not
/// exist.
pub fn classify(path: &Path) -> Result<FileKind, AppError> {
    let meta = fs::metadata(path).map_err(|err| AppError::from_io(err, path))?;
    let file_type = meta.file_type();
    if file_type.is_file() {
        Ok(FileKind::File)
    } else if file_type.is_dir() {
        Ok(FileKind::Directory)
    } else {
        Ok(FileKind::Other)
    }
}

/// Normalize a path by resolving `.` and `..` components logically.
/// This does not access the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    let mut ret = if let Some(Component::RootDir) = components.peek() {
        components.next();
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::Prefix(..) => {
                // Keep prefix as is (e.g., C:\ on Windows)
                ret.push(component.as_os_str());
            }
            Component::RootDir => {
                ret.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                ret.pop();
            }
            Component::Normal(c) => {
                ret.push(c);
            }
        }
    }
    ret
}

/// Copy a regular file, preserving permissions, overwriting `to` if present.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), AppError> {
    fs::copy(from, to).map_err(|err| AppError::from_io(err, from))?;
    Ok(())
}

/// Recursively copy a directory tree into `to`, creating it if needed.
///
/// Merge semantics: files already present under `to` are overwritten when a
/// matching source file exists; entries only present under `to` are left
/// alone.
pub fn copy_tree(from: &Path, to: &Path) -> Result<(), AppError> {
    fs::create_dir_all(to).map_err(|err| AppError::from_io(err, to))?;

    for entry in fs::read_dir(from).map_err(|err| AppError::from_io(err, from))? {
        let entry = entry.map_err(AppError::Io)?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(|err| AppError::from_io(err, &source))?;

        if file_type.is_dir() {
            copy_tree(&source, &target)?;
        } else if file_type.is_file() {
            copy_file(&source, &target)?;
        } else if file_type.is_symlink() {
            copy_symlink(&source, &target)?;
        }
        // Other kinds (sockets, devices) are skipped rather than failing
        // the whole tree copy.
    }
    Ok(())
}

/// Delete a regular file or a whole directory tree.
pub fn remove_any(path: &Path, kind: FileKind) -> Result<(), AppError> {
    let result = match kind {
        FileKind::File => fs::remove_file(path),
        FileKind::Directory => fs::remove_dir_all(path),
        FileKind::Other => {
            return Err(AppError::unsupported(path));
        }
    };
    result.map_err(|err| AppError::from_io(err, path))
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<(), AppError> {
    let target = fs::read_link(from).map_err(|err| AppError::from_io(err, from))?;
    if to.symlink_metadata().is_ok() {
        fs::remove_file(to).map_err(|err| AppError::from_io(err, to))?;
    }
    std::os::unix::fs::symlink(&target, to).map_err(|err| AppError::from_io(err, to))?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<(), AppError> {
    // Fall back to copying the link target's content.
    copy_file(from, to)
}

/// The base name of a path as a `String`, or the whole path when it has no
/// final component (e.g. `/`).
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
